use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use options_surface::models::{
    compute_plot_data, ChainFilter, ChainRow, Metric, OptionType, OptionsData,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn row(option_type: OptionType, expiration: &str, strike: f64, mark: f64) -> ChainRow {
    ChainRow {
        option_type,
        expiration: expiration.to_string(),
        strike,
        mark,
        delta: -0.5,
        gamma: 0.01,
        theta: -0.02,
        vega: 0.15,
        rho: -0.03,
    }
}

fn wide_filter(option_type: OptionType) -> ChainFilter {
    ChainFilter {
        option_type,
        start_date: date(2000, 1, 1),
        end_date: date(2100, 1, 1),
        from_strike: 0.0,
        to_strike: 1e9,
    }
}

#[test]
fn rows_are_ordered_by_expiry_date_then_strike_value() {
    let data = OptionsData::from_rows(
        100.0,
        vec![
            row(OptionType::Put, "2024-03-15", 100.0, 3.0),
            row(OptionType::Put, "2024-02-01", 105.0, 6.0),
            row(OptionType::Put, "2024-02-01", 95.0, 1.0),
        ],
    );

    let plot = compute_plot_data(&data, &wide_filter(OptionType::Put), Metric::MarkPrice, now());
    let feb = (date(2024, 2, 1).and_hms_opt(0, 0, 0).unwrap().and_utc() - now()).num_milliseconds() as f64
        / 86_400_000.0;
    let mar = (date(2024, 3, 15).and_hms_opt(0, 0, 0).unwrap().and_utc() - now()).num_milliseconds() as f64
        / 86_400_000.0;

    assert_eq!(plot.x.data, vec![feb.ceil(), feb.ceil(), mar.ceil()]);
    assert_eq!(plot.y.data, vec![95.0, 105.0, 100.0]);
    assert_eq!(plot.z.data, vec![1.0, 6.0, 3.0]);
    assert_eq!(plot.x.name, "Days Til Expiration");
    assert_eq!(plot.y.name, "Strike Price");
    assert_eq!(plot.z.name, "markPrice");
}

#[test]
fn filter_bounds_are_inclusive() {
    let data = OptionsData::from_rows(
        100.0,
        vec![
            row(OptionType::Call, "2024-01-08", 90.0, 1.0),
            row(OptionType::Call, "2024-01-08", 110.0, 1.0),
            row(OptionType::Call, "2024-02-12", 100.0, 1.0),
            row(OptionType::Call, "2024-01-07", 100.0, 1.0),
            row(OptionType::Call, "2024-02-13", 100.0, 1.0),
            row(OptionType::Call, "2024-01-20", 89.99, 1.0),
            row(OptionType::Call, "2024-01-20", 110.01, 1.0),
        ],
    );
    let filter = ChainFilter {
        option_type: OptionType::Call,
        start_date: date(2024, 1, 8),
        end_date: date(2024, 2, 12),
        from_strike: 90.0,
        to_strike: 110.0,
    };

    let plot = compute_plot_data(&data, &filter, Metric::Delta, now());
    assert_eq!(plot.len(), 3);
    assert_eq!(plot.y.data, vec![90.0, 110.0, 100.0]);
}

#[test]
fn narrowing_the_filter_yields_a_subset() {
    let rows: Vec<ChainRow> = ["2024-01-15", "2024-02-16", "2024-03-15"]
        .iter()
        .flat_map(|expiry| {
            (80..=120)
                .step_by(5)
                .map(move |strike| row(OptionType::Put, expiry, strike as f64, strike as f64 / 20.0))
        })
        .collect();
    let data = OptionsData::from_rows(100.0, rows);

    let all = compute_plot_data(&data, &wide_filter(OptionType::Put), Metric::Gamma, now());
    let narrow = ChainFilter {
        option_type: OptionType::Put,
        start_date: date(2024, 2, 1),
        end_date: date(2024, 3, 1),
        from_strike: 92.5,
        to_strike: 107.5,
    };
    let some = compute_plot_data(&data, &narrow, Metric::Gamma, now());

    assert_eq!(all.len(), 27);
    assert_eq!(some.len(), 3);
    let all_rows: Vec<_> = all.rows().collect();
    assert!(some.rows().all(|r| all_rows.contains(&r)));
}

#[test]
fn extrinsic_value_end_to_end() {
    let data = OptionsData::from_rows(95.0, vec![row(OptionType::Put, "2024-01-11", 100.0, 5.0)]);
    let filter = ChainFilter {
        option_type: OptionType::Put,
        start_date: date(2024, 1, 1),
        end_date: date(2024, 1, 31),
        from_strike: 90.0,
        to_strike: 110.0,
    };

    let plot = compute_plot_data(&data, &filter, Metric::ExtrinsicValue, now());
    assert_eq!(plot.x.data, vec![10.0]);
    assert_eq!(plot.y.data, vec![100.0]);
    assert_eq!(plot.z.data, vec![0.0]);

    let intrinsic = compute_plot_data(&data, &filter, Metric::IntrinsicValue, now());
    assert_eq!(intrinsic.z.data, vec![5.0]);
}

#[test]
fn other_side_and_empty_window_yield_empty_axes() {
    let data = OptionsData::from_rows(95.0, vec![row(OptionType::Put, "2024-01-11", 100.0, 5.0)]);
    assert!(compute_plot_data(&data, &wide_filter(OptionType::Call), Metric::Rho, now()).is_empty());

    let mut filter = wide_filter(OptionType::Put);
    filter.start_date = date(2025, 1, 1);
    filter.end_date = date(2024, 1, 1);
    let plot = compute_plot_data(&data, &filter, Metric::Rho, now());
    assert!(plot.is_empty());
    assert_eq!(plot.z.name, "rho");
}
