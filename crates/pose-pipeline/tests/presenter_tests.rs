use pose_base::{Origin, Rect, Vec2, Vec3};
use pose_graph::{ImageFormat, ImageFrame, NormalizedLandmark, Packet, Timestamp, fixed_pose};
use pose_pipeline::{DEFAULT_LANDMARK_RANGE, LandmarkRange, PipelineError, Presenter, Texture};

fn presenter(range: LandmarkRange) -> Presenter {
    Presenter::new(
        Vec2::new(4, 2),
        Rect::new(Vec2::new(100.0, 50.0), Vec2::new(200.0, 100.0)),
        Origin::TopLeft,
        range,
    )
}

fn image(size: Vec2<usize>, fill: u8) -> Packet<ImageFrame> {
    let pixels = vec![fill; size.area() * 4];
    let frame = ImageFrame::from_pixels(ImageFormat::Srgba, size, &pixels).unwrap();
    Packet::new(frame, Timestamp::from_micros(7))
}

#[test]
fn test_texture_starts_clean() {
    let mut texture = Texture::new(Vec2::new(3, 3));
    assert_eq!(texture.pixels().len(), 36);
    assert!(!texture.is_dirty());
    assert!(!texture.take_dirty());
}

#[test]
fn test_present_image_marks_texture_dirty_once() {
    let mut presenter = presenter(DEFAULT_LANDMARK_RANGE);
    presenter.present_image(&image(Vec2::new(4, 2), 200)).unwrap();

    let texture = presenter.texture_mut();
    assert!(texture.pixels().iter().all(|&p| p == 200));
    assert!(texture.take_dirty());
    assert!(!texture.take_dirty());
}

#[test]
fn test_present_image_size_mismatch() {
    let mut presenter = presenter(DEFAULT_LANDMARK_RANGE);
    let result = presenter.present_image(&image(Vec2::new(2, 2), 1));
    assert!(matches!(result, Err(PipelineError::Present(_))));
    assert!(!presenter.texture().is_dirty());
    assert!(presenter.texture().pixels().iter().all(|&p| p == 0));
}

#[test]
fn test_landmarks_map_into_offset_rect() {
    let mut pose = fixed_pose();
    pose[1] = NormalizedLandmark::new(0.0, 0.0, 0.0);
    pose[2] = NormalizedLandmark::new(0.5, 0.25, -0.1);
    pose[32] = NormalizedLandmark::new(1.0, 1.0, 0.0);
    let mut presenter = presenter(DEFAULT_LANDMARK_RANGE);
    let points = presenter
        .present_landmarks(&Packet::new(pose, Timestamp::from_micros(3)))
        .unwrap();

    assert_eq!(points.len(), 32);
    assert_eq!(points[0].position, Vec3::new(100.0, 50.0, 0.0));
    assert_eq!(points[1].position, Vec3::new(200.0, 75.0, -20.0));
    assert_eq!(points[31].position, Vec3::new(300.0, 150.0, 0.0));
    assert_eq!(presenter.landmarks_timestamp(), Some(Timestamp::from_micros(3)));
}

#[test]
fn test_short_list_keeps_previous_landmarks() {
    let mut presenter = presenter(DEFAULT_LANDMARK_RANGE);
    presenter
        .present_landmarks(&Packet::new(fixed_pose(), Timestamp::from_micros(1)))
        .unwrap();
    let before = presenter.landmarks().to_vec();

    let short = vec![NormalizedLandmark::default(); 32];
    let result = presenter.present_landmarks(&Packet::new(short, Timestamp::from_micros(2)));
    assert!(matches!(result, Err(PipelineError::Present(_))));
    assert_eq!(presenter.landmarks(), &before[..]);
    assert_eq!(presenter.landmarks_timestamp(), Some(Timestamp::from_micros(1)));
}

#[test]
fn test_set_screen_applies_to_next_packet() {
    let mut presenter = presenter(LandmarkRange::new(0, 0));
    let pose = vec![NormalizedLandmark::new(1.0, 1.0, 0.0)];
    presenter
        .present_landmarks(&Packet::new(pose.clone(), Timestamp::from_micros(1)))
        .unwrap();
    assert_eq!(presenter.landmarks()[0].position, Vec3::new(300.0, 150.0, 0.0));

    presenter.set_screen(Rect::from_pixels(Vec2::new(10, 10)));
    assert_eq!(presenter.landmarks()[0].position, Vec3::new(300.0, 150.0, 0.0));
    presenter
        .present_landmarks(&Packet::new(pose, Timestamp::from_micros(2)))
        .unwrap();
    assert_eq!(presenter.landmarks()[0].position, Vec3::new(10.0, 10.0, 0.0));
}

#[test]
fn test_landmark_range_len() {
    assert_eq!(DEFAULT_LANDMARK_RANGE.len(), 32);
    assert!(!DEFAULT_LANDMARK_RANGE.contains(0));
    assert!(DEFAULT_LANDMARK_RANGE.contains(32));
    assert_eq!(LandmarkRange::new(3, 2).len(), 0);
    assert!(LandmarkRange::new(3, 2).is_empty());
}

#[test]
fn test_unbounded_range_does_not_overflow() {
    let range = LandmarkRange::new(0, usize::MAX);
    assert_eq!(range.len(), usize::MAX);
    assert_eq!(LandmarkRange::new(1, usize::MAX).len(), usize::MAX);

    let mut presenter = presenter(range);
    let pose = Packet::new(fixed_pose(), Timestamp::from_micros(1));
    assert!(matches!(presenter.present_landmarks(&pose), Err(PipelineError::Present(_))));
    assert!(presenter.landmarks().is_empty());
}
