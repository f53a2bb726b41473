mod common;

use common::{FakeInput, FakeMirrorBackend};
use textarea_wasm::mirror::{MirrorService, MirrorState};
use textarea_wasm::surface::LineInput;
use textarea_wasm::Point;

const FALLBACK: Point = Point::new(-1.0, -1.0);

fn service(backend: FakeMirrorBackend) -> MirrorService<FakeMirrorBackend> {
    MirrorService::new(backend, FALLBACK)
}

#[test]
fn test_first_lookup_creates_and_styles_mirror() {
    let mut mirrors = service(FakeMirrorBackend::default());
    let input = FakeInput::new(0, "1234");
    assert_eq!(mirrors.state(7), MirrorState::Uncreated);

    let point = mirrors.get_character_position(7, &input, 2);

    assert_eq!(point, Point::new(20.0, 0.0));
    assert_eq!(mirrors.state(7), MirrorState::Cached);
    assert_eq!(mirrors.backend().mirrors_created, 1);
    assert_eq!(mirrors.backend().style_copies, 1);
}

#[test]
fn test_batch_measures_each_uncached_index_once() {
    let mut mirrors = service(FakeMirrorBackend::default());
    let input = FakeInput::new(0, "1234");

    let positions = mirrors.get_character_positions(0, &input, &[3, 1, 1, 10]);

    // 10 clamps to the end of the line (4)
    assert_eq!(positions.len(), 3);
    assert_eq!(positions[&1], Point::new(10.0, 0.0));
    assert_eq!(positions[&3], Point::new(30.0, 0.0));
    assert_eq!(positions[&10], Point::new(40.0, 0.0));
    assert_eq!(mirrors.backend().measurements, 3);

    mirrors.get_character_positions(0, &input, &[1, 3, 4]);
    assert_eq!(mirrors.backend().measurements, 3);
    assert_eq!(mirrors.cached_len(0), 3);
}

#[test]
fn test_text_change_invalidates_cache() {
    let mut mirrors = service(FakeMirrorBackend::default());
    let input = FakeInput::new(0, "12");
    mirrors.get_character_position(0, &input, 1);
    assert_eq!(mirrors.backend().measurements, 1);

    input.set_value("112");
    mirrors.get_character_position(0, &input, 1);
    assert_eq!(mirrors.backend().measurements, 2);
    assert_eq!(mirrors.backend().mirrors_created, 1);
}

#[test]
fn test_explicit_invalidation_drops_positions() {
    let mut mirrors = service(FakeMirrorBackend::default());
    let input = FakeInput::new(0, "123");
    mirrors.get_character_positions(0, &input, &[0, 1, 2]);

    mirrors.invalidate_cache(0);
    assert_eq!(mirrors.state(0), MirrorState::Styled);
    assert_eq!(mirrors.cached_len(0), 0);

    mirrors.get_character_position(0, &input, 1);
    assert_eq!(mirrors.backend().measurements, 4);
}

#[test]
fn test_sync_styles_recopies_and_invalidates() {
    let mut mirrors = service(FakeMirrorBackend::default());
    let input = FakeInput::new(0, "123");
    mirrors.get_character_position(0, &input, 1);

    mirrors.sync_styles(0, &input);
    assert_eq!(mirrors.backend().style_copies, 2);
    assert_eq!(mirrors.cached_len(0), 0);
}

#[test]
fn test_detached_source_returns_fallback() {
    let mut mirrors = service(FakeMirrorBackend::default());
    let input = FakeInput::new(0, "123");
    input.set_connected(false);

    assert_eq!(mirrors.get_character_position(0, &input, 1), FALLBACK);
    assert_eq!(mirrors.state(0), MirrorState::Uncreated);
    assert_eq!(mirrors.backend().measurements, 0);
    assert_eq!(mirrors.hit_test(0, &input, Point::new(25.0, 0.0)), 0);
}

#[test]
fn test_release_removes_mirror() {
    let mut mirrors = service(FakeMirrorBackend::default());
    let input = FakeInput::new(0, "1");
    mirrors.get_character_position(0, &input, 0);

    mirrors.release(0);
    assert_eq!(mirrors.state(0), MirrorState::Uncreated);
    assert_eq!(mirrors.backend().mirrors_removed, 1);
}

#[test]
fn test_wrapped_positions_move_to_next_row() {
    let mut mirrors = service(FakeMirrorBackend::wrapping(4));
    let input = FakeInput::new(0, "123456");

    assert_eq!(mirrors.get_character_position(0, &input, 5), Point::new(10.0, 20.0));
}

#[test]
fn test_hit_test_picks_row_then_nearest_boundary() {
    let mut mirrors = service(FakeMirrorBackend::wrapping(4));
    let input = FakeInput::new(0, "123456");

    assert_eq!(mirrors.hit_test(0, &input, Point::new(23.0, 5.0)), 2);
    assert_eq!(mirrors.hit_test(0, &input, Point::new(27.0, 5.0)), 3);
    assert_eq!(mirrors.hit_test(0, &input, Point::new(12.0, 25.0)), 5);
}

#[test]
fn test_selection_rects_one_per_row() {
    let mut mirrors = service(FakeMirrorBackend::wrapping(4));
    let input = FakeInput::new(0, "123456");

    let rects = mirrors.selection_rects(0, &input, 1, 6, 20.0);

    assert_eq!(rects.len(), 2);
    assert_eq!((rects[0].x, rects[0].y, rects[0].width), (10.0, 0.0, 30.0));
    assert_eq!((rects[1].x, rects[1].y, rects[1].width), (0.0, 20.0, 20.0));
    assert!(rects.iter().all(|rect| rect.height == 20.0));

    assert!(mirrors.selection_rects(0, &input, 3, 3, 20.0).is_empty());
}

#[test]
fn test_selection_rects_cover_last_character_of_wrapped_row() {
    let mut mirrors = service(FakeMirrorBackend::wrapping(4));
    let input = FakeInput::new(0, "123456");

    let rects = mirrors.selection_rects(0, &input, 3, 4, 20.0);
    assert_eq!(rects.len(), 1);
    assert_eq!((rects[0].x, rects[0].y, rects[0].width), (30.0, 0.0, 10.0));

    // The row break falls inside the selection
    let rects = mirrors.selection_rects(0, &input, 2, 5, 20.0);
    assert_eq!(rects.len(), 2);
    assert_eq!((rects[0].x, rects[0].width), (20.0, 20.0));
    assert_eq!((rects[1].x, rects[1].y, rects[1].width), (0.0, 20.0, 10.0));
}
