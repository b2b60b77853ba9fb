mod cancel;
mod download;
mod health;
mod job_result;
mod job_status;
mod languages;
mod remote;
mod upload;

pub use cancel::cancel_handler;
pub use download::download_handler;
pub use health::health_handler;
pub use job_result::job_result_handler;
pub use job_status::job_status_handler;
pub use languages::languages_handler;
pub use remote::remote_handler;
pub use upload::upload_handler;
