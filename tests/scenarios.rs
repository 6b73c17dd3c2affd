#![warn(clippy::pedantic)]

use std::f64::consts::PI;

use approx::assert_relative_eq;
use offshorex::config::{resolve, Overrides};
use offshorex::dispatch::Outcome;
use offshorex::marine::flooding::{self, FloodingParams};
use offshorex::sweep::Sweep;
use offshorex::waves::wavelength::{self, DepthType, WavelengthParams};

#[test]
fn site_periods_are_deep_water_by_majority() {
    let params: WavelengthParams = resolve(&Overrides::new()).expect("defaults resolve");
    assert_eq!(wavelength::classify(&params), Some(DepthType::Deep));

    let lengths = wavelength::deep_water_lengths(&params);
    for (length, period) in lengths.iter().zip([9.4_f64, 11.5, 12.0]) {
        assert_relative_eq!(*length, 9.81 * period.powi(2) / (2.0 * PI), max_relative = 1.0e-12);
    }

    match wavelength::run(&params) {
        Outcome::Completed { artifacts, text: Some(text) } => {
            assert!(artifacts.is_empty());
            assert!(text.contains("Water depth type (by majority): Deep"));
            assert!(text.contains("137.95"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn period_overrides_replace_the_defaults() {
    let mut overrides = Overrides::new();
    overrides.set("depth", 10.0).set_list("periods", &[40.0, 60.0, 2.0]);
    let params: WavelengthParams = resolve(&overrides).expect("overrides resolve");
    assert_eq!(wavelength::classify(&params), Some(DepthType::Shallow));
}

#[test]
fn fifty_millimetre_breach_floods_the_pile_sleeve_in_about_ten_hours() {
    let params = FloodingParams::default();
    let head = (28000e3 / 5400.0) / (1025.0 * 9.81);
    assert_relative_eq!(flooding::head(&params), head, max_relative = 1.0e-12);

    let velocity = 0.75 * (2.0 * 9.81 * head).sqrt();
    assert_relative_eq!(flooding::ingress_velocity(&params), velocity, max_relative = 1.0e-12);

    let flow = flooding::flow_rate(&params, &Sweep::from(vec![0.050]));
    assert_relative_eq!(flow[0], PI * 0.05_f64.powi(2) / 4.0 * velocity, max_relative = 1.0e-12);

    let hours = flooding::time_to_flood(170.0, &flow)[0];
    assert!((hours - 10.08).abs() < 0.01, "took {hours} h");
}

#[test]
fn larger_buoyancy_floods_faster() {
    let mut overrides = Overrides::new();
    overrides.set("buoyancy", 56000e3);
    let heavier: FloodingParams = resolve(&overrides).expect("buoyancy resolves");
    let d = Sweep::from(vec![0.050]);
    let base = flooding::flow_rate(&FloodingParams::default(), &d)[0];
    assert_relative_eq!(flooding::flow_rate(&heavier, &d)[0], base * 2.0_f64.sqrt(), max_relative = 1.0e-12);
}
