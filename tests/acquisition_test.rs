use skriva::application::ports::{AcquisitionError, MediaAcquirer};
use skriva::infrastructure::acquisition::YtDlpAcquirer;

fn acquirer() -> (YtDlpAcquirer, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let acquirer = YtDlpAcquirer::new("yt-dlp".to_string(), dir.path().to_path_buf()).unwrap();
    (acquirer, dir)
}

#[test]
fn given_watch_url_when_validated_then_video_id_extracted() {
    let (acquirer, _dir) = acquirer();

    let id = acquirer
        .validate("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .unwrap();

    assert_eq!(id, "dQw4w9WgXcQ");
}

#[test]
fn given_short_url_when_validated_then_video_id_extracted() {
    let (acquirer, _dir) = acquirer();

    assert_eq!(
        acquirer.validate("https://youtu.be/dQw4w9WgXcQ").unwrap(),
        "dQw4w9WgXcQ"
    );
    assert_eq!(
        acquirer
            .validate("https://www.youtube.com/shorts/dQw4w9WgXcQ")
            .unwrap(),
        "dQw4w9WgXcQ"
    );
    assert_eq!(
        acquirer
            .validate("https://www.youtube.com/embed/dQw4w9WgXcQ")
            .unwrap(),
        "dQw4w9WgXcQ"
    );
}

#[test]
fn given_surrounding_whitespace_when_validated_then_still_accepted() {
    let (acquirer, _dir) = acquirer();

    assert!(acquirer
        .validate("  https://youtu.be/dQw4w9WgXcQ  ")
        .is_ok());
}

#[test]
fn given_non_video_url_when_validated_then_rejected() {
    let (acquirer, _dir) = acquirer();

    let err = acquirer.validate("https://example.com/clip.mp4").unwrap_err();

    assert!(matches!(err, AcquisitionError::InvalidReference(_)));
}

#[test]
fn given_playlist_url_without_video_when_validated_then_rejected() {
    let (acquirer, _dir) = acquirer();

    let err = acquirer
        .validate("https://www.youtube.com/playlist?list=PL123")
        .unwrap_err();

    assert!(matches!(err, AcquisitionError::InvalidReference(_)));
}
