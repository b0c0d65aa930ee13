use sheet_packer_core::prelude::*;
use sheet_packer_core::SheetPackerError;

fn sheet(constraints: Constraints, sprites: &[(&str, u32, u32)]) -> Sheet<String> {
    let mut s = Sheet::new(constraints);
    for (key, w, h) in sprites {
        s.push_sprite(key.to_string(), *w, *h);
    }
    s
}

fn position(sheet: &Sheet<String>, key: &str) -> Position {
    sheet
        .sprites()
        .into_iter()
        .find(|s| s.key == key)
        .map(|s| s.position)
        .expect("sprite present")
}

#[test]
fn single_sprite_with_pow2_and_aspect() {
    let c = Constraints::new(16, 32, true, true).unwrap();
    let mut s = sheet(c, &[("a", 6, 6)]);
    pack_sheet(&mut s).expect("pack");
    assert_eq!(position(&s, "a"), Position::new(0, 0));
    assert_eq!((s.width, s.height), (8, 16));
}

#[test]
fn sprite_larger_than_max_fails() {
    let c = Constraints::new(2, 2, false, false).unwrap();
    let mut s = sheet(c, &[("a", 3, 4)]);
    let err = pack_sheet(&mut s).unwrap_err();
    assert!(matches!(err, SheetPackerError::SizeTooSmall { .. }));
    assert!(!err.is_config());
}

#[test]
fn widest_sprite_goes_first() {
    let mut s = sheet(Constraints::default(), &[("a", 3, 4), ("b", 5, 5)]);
    pack_sheet(&mut s).expect("pack");
    assert_eq!(position(&s, "b"), Position::new(0, 0));
    assert_eq!(position(&s, "a"), Position::new(5, 0));
    assert_eq!((s.width, s.height), (8, 5));
}

#[test]
fn east_zone_is_widened_to_fit() {
    let mut s = sheet(
        Constraints::default(),
        &[("c", 5, 3), ("a", 10, 2), ("b", 6, 4)],
    );
    let mut packer = SheetPacker::new(GrowthPolicy::HighestFit);
    let c = s.constraints.clone();
    packer.pack(&mut s, &c).expect("pack");

    // b opens a south row and leaves a 4-wide zone on the east border; c widens it by one.
    assert_eq!(position(&s, "a"), Position::new(0, 0));
    assert_eq!(position(&s, "b"), Position::new(0, 2));
    assert_eq!(position(&s, "c"), Position::new(6, 2));
    assert_eq!((s.width, s.height), (11, 6));
    assert_eq!(packer.canvas_size(), (11, 6));
    assert_eq!(
        packer.zones(),
        &[Rect::new(10, 0, 1, 2), Rect::new(6, 5, 5, 1)]
    );
}

#[test]
fn tall_canvas_grows_width() {
    let mut s = sheet(Constraints::default(), &[("a", 5, 20), ("b", 5, 1)]);
    pack_sheet(&mut s).expect("pack");
    assert_eq!(position(&s, "b"), Position::new(5, 0));
    assert_eq!((s.width, s.height), (10, 20));
}

#[test]
fn wide_canvas_grows_height() {
    let mut s = sheet(Constraints::default(), &[("a", 20, 5), ("b", 1, 5)]);
    pack_sheet(&mut s).expect("pack");
    assert_eq!(position(&s, "b"), Position::new(0, 5));
    assert_eq!((s.width, s.height), (20, 10));
}

#[test]
fn smaller_side_past_max_fails() {
    let c = Constraints::new(100, 8, false, false).unwrap();
    let mut s = sheet(c, &[("a", 20, 5), ("b", 20, 4)]);
    let err = pack_sheet(&mut s).unwrap_err();
    assert!(matches!(
        err,
        SheetPackerError::SizeTooSmall {
            width: 20,
            height: 4,
            max_width: 100,
            max_height: 8
        }
    ));
    assert_eq!(position(&s, "a"), Position::new(0, 0));
    assert_eq!(position(&s, "b"), Position::UNPLACED);
    assert_eq!((s.width, s.height), (0, 0));
}

#[test]
fn diagonal_pow2_tall_canvas_grows_width() {
    let c = Constraints::builder().pow2(true).build().unwrap();
    let mut s = sheet(c, &[("a", 4, 16), ("b", 4, 1)]);
    pack_sheet(&mut s).expect("pack");
    assert_eq!(position(&s, "b"), Position::new(4, 0));
    assert_eq!((s.width, s.height), (8, 16));
}

#[test]
fn diagonal_pow2_wide_canvas_grows_height() {
    let c = Constraints::builder().pow2(true).build().unwrap();
    let mut s = sheet(c, &[("a", 16, 4), ("b", 1, 4)]);
    pack_sheet(&mut s).expect("pack");
    assert_eq!(position(&s, "b"), Position::new(0, 4));
    assert_eq!((s.width, s.height), (16, 8));
}

#[test]
fn diagonal_pow2_smaller_side_past_max_fails() {
    let c = Constraints::new(128, 8, true, false).unwrap();
    // 4 + 5 rows round up to 16; widening to 32 would have fit but is not tried.
    let mut s = sheet(c, &[("a", 16, 4), ("b", 16, 5)]);
    let err = pack_sheet(&mut s).unwrap_err();
    assert!(matches!(err, SheetPackerError::SizeTooSmall { .. }));
    assert_eq!(position(&s, "b"), Position::UNPLACED);
}

#[test]
fn diagonal_pow2_grows_to_next_power_of_two() {
    let c = Constraints::builder().pow2(true).build().unwrap();
    let mut s = sheet(c, &[("a", 6, 6), ("b", 3, 3)]);
    pack_sheet(&mut s).expect("pack");
    assert_eq!(position(&s, "a"), Position::new(0, 0));
    assert_eq!(position(&s, "b"), Position::new(6, 0));
    assert_eq!((s.width, s.height), (16, 8));
}

#[test]
fn highest_fit_grows_exactly() {
    let mut s = sheet(Constraints::default(), &[("a", 6, 6), ("b", 3, 3)]);
    pack_sheet(&mut s).expect("pack");
    // square canvas: the tie grows the width
    assert_eq!(position(&s, "b"), Position::new(6, 0));
    assert_eq!((s.width, s.height), (9, 6));
}

#[test]
fn aspect_ratio_growth_fills_row() {
    let c = Constraints::new(200, 100, false, true).unwrap();
    let mut s = sheet(c, &[("a", 10, 10), ("b", 10, 10)]);
    pack_sheet(&mut s).expect("pack");
    assert_eq!(position(&s, "a"), Position::new(0, 0));
    assert_eq!(position(&s, "b"), Position::new(10, 0));
    assert_eq!((s.width, s.height), (20, 10));
}

#[test]
fn aspect_pow2_reuses_free_zone() {
    let c = Constraints::new(16, 32, true, true).unwrap();
    let mut s = sheet(c, &[("a", 6, 6), ("b", 6, 6)]);
    pack_sheet(&mut s).expect("pack");
    assert_eq!(position(&s, "a"), Position::new(0, 0));
    assert_eq!(position(&s, "b"), Position::new(0, 6));
    assert_eq!((s.width, s.height), (8, 16));
}

/// The side derived through the aspect ratio is never rounded to a power of two on its own.
/// Power-of-two maxima make the ratio a power of two, so the derived side still is one.
#[test]
fn aspect_pow2_derived_side_follows_ratio() {
    let c = Constraints::new(16, 64, true, true).unwrap();
    let mut s = sheet(c, &[("dot", 1, 1)]);
    pack_sheet(&mut s).expect("pack");
    assert_eq!((s.width, s.height), (1, 4));
}

#[test]
fn equal_widths_in_any_order_give_same_canvas() {
    let mut up = sheet(Constraints::default(), &[("a", 16, 3), ("b", 16, 5), ("c", 16, 7)]);
    let mut down = sheet(Constraints::default(), &[("c", 16, 7), ("b", 16, 5), ("a", 16, 3)]);
    pack_sheet(&mut up).expect("pack");
    pack_sheet(&mut down).expect("pack");
    assert_eq!((up.width, up.height), (16, 15));
    assert_eq!((down.width, down.height), (16, 15));
}

#[test]
fn pack_layout_returns_input_order() {
    let layout = pack_layout(vec![("a", 3, 4), ("b", 5, 5)], Constraints::default()).unwrap();
    let keys: Vec<&str> = layout.sprites.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(layout.sprites[0].frame, Rect::new(5, 0, 3, 4));
    assert_eq!(layout.meta.policy, "highest-fit");
    let stats = layout.stats();
    assert_eq!(stats.canvas_area, 40);
    assert_eq!(stats.used_area, 37);
    assert_eq!(stats.wasted_area(), 3);
}
