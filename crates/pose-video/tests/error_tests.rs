use pose_video::VideoError;
use std::io;

#[test]
fn test_from_io_error() {
    let err: VideoError = io::Error::new(io::ErrorKind::NotFound, "no /dev/video0").into();
    match err {
        VideoError::Device(msg) => assert!(msg.contains("/dev/video0")),
        _ => panic!("Expected VideoError::Device"),
    }
}

#[test]
fn test_error_display() {
    assert_eq!(VideoError::NoDevices.to_string(), "no capture devices found");
    assert!(VideoError::Stream("dequeue failed".into()).to_string().contains("dequeue failed"));
    assert!(VideoError::Channel("closed".into()).to_string().starts_with("channel error"));
}
