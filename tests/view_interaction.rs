use glam::Vec2;
use options_surface::models::{AxisData, OptionType};
use options_surface::viz::scene::{FAVORABLE_COLOR, UNFAVORABLE_COLOR};
use options_surface::viz::tooltip::TOOLTIP_OFFSET;
use options_surface::viz::{PlotScene, SceneHandle, SceneUpdate, ViewSession};

const SURFACE: Vec2 = Vec2::new(800.0, 600.0);

fn single_contract() -> AxisData {
    let mut data = AxisData::new("Days Til Expiration", "Strike Price", "extrinsicValue");
    data.push(10.0, 100.0, 0.0);
    data
}

fn session_with(data: &AxisData, option_type: OptionType, price: f64) -> ViewSession {
    let mut session = ViewSession::new();
    session.install(SceneHandle::new(PlotScene::build(data, option_type, price)));
    session.set_surface_size(SURFACE);
    session
}

#[test]
fn hovering_a_point_shows_its_source_values() {
    // A single sample sits at the cube centre, which the default camera looks at
    let mut session = session_with(&single_contract(), OptionType::Put, 95.0);

    let centre = SURFACE / 2.0;
    let tooltip = session.on_pointer_move(centre).clone();
    assert!(tooltip.visible);
    assert_eq!(
        tooltip.content,
        "Days Til Expiration: 10.00, Strike Price: 100.00, extrinsicValue: 0.00"
    );
    assert_eq!(tooltip.box_origin(), centre + TOOLTIP_OFFSET);
}

#[test]
fn hovering_empty_space_hides_the_tooltip() {
    let mut session = session_with(&single_contract(), OptionType::Put, 95.0);
    assert!(session.on_pointer_move(SURFACE / 2.0).visible);
    assert!(!session.on_pointer_move(Vec2::new(5.0, 5.0)).visible);
}

#[test]
fn price_change_only_repositions() {
    let mut data = AxisData::new("Days Til Expiration", "Strike Price", "delta");
    data.push(7.0, 90.0, -0.3);
    data.push(35.0, 110.0, -0.6);

    let session = ViewSession::new();
    assert_eq!(session.plan_update(&data, OptionType::Put, 100.0, 1.0), SceneUpdate::Rebuilt);

    let mut scene = PlotScene::build(&data, OptionType::Put, 100.0);
    let points = scene.points.clone();
    scene.set_price(105.0);
    assert_eq!(scene.points, points);
    assert_eq!(scene.price_level(), 5.0);
    assert_eq!(scene.price_label.text, "Price: $105");
}

#[test]
fn degenerate_strikes_put_price_plane_at_centre() {
    let mut data = AxisData::new("Days Til Expiration", "Strike Price", "gamma");
    data.push(7.0, 100.0, 0.01);
    data.push(14.0, 100.0, 0.02);

    let scene = PlotScene::build(&data, OptionType::Call, 120.0);
    assert_eq!(scene.grid.position.y, 0.0);
    assert!(scene.points.positions.iter().all(|p| p.y == 0.0));
    assert_eq!(scene.upper_box.color, UNFAVORABLE_COLOR);
    assert_eq!(scene.lower_box.color, FAVORABLE_COLOR);
}
