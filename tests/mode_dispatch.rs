#![warn(clippy::pedantic)]

use std::fs;

use offshorex::config::{resolve, Overrides};
use offshorex::dispatch::Outcome;
use offshorex::marine::motions::{self, VesselClass, VesselParams};
use offshorex::marine::pile_tow::{self, PileTowParams, StressKind};
use offshorex::plate::yield_line::{self, EdgeSupport, YieldLineParams};
use offshorex::reliability::partial_factor::{self, PartialFactorParams};
use offshorex::wind::en1991::{self, EnWindParams, Profile};
use offshorex::{ConfigurationError, DomainWarning};

fn written(dir: &tempfile::TempDir) -> usize {
    fs::read_dir(dir.path()).expect("output directory readable").count()
}

#[test]
fn no_mode_writes_nothing() {
    let dir = tempfile::tempdir().expect("temporary directory");
    let out = dir.path();

    let outcomes = [
        en1991::run(&EnWindParams::default(), None, out),
        motions::run(&VesselParams::default(), None, out),
        pile_tow::run(&PileTowParams::default(), None, out),
        yield_line::run(&YieldLineParams::default(), None, out),
        partial_factor::run(&PartialFactorParams::default(), 3, out),
    ];
    for outcome in outcomes {
        let outcome = outcome.expect("no selection is not an error");
        assert!(matches!(outcome, Outcome::NoSelection { .. }), "{outcome:?}");
    }
    assert_eq!(written(&dir), 0);
}

#[test]
fn structure_above_reference_height_is_skipped() {
    let dir = tempfile::tempdir().expect("temporary directory");
    let mut overrides = Overrides::new();
    overrides.set("height", 250.0);
    let params: EnWindParams = resolve(&overrides).expect("height resolves");

    let outcome = en1991::run(&params, Some(Profile::TurbulenceIntensity), dir.path())
        .expect("domain warning is not an error");
    assert_eq!(
        outcome,
        Outcome::Skipped(DomainWarning::HeightAboveReference {
            height: 250.0,
            limit: 200.0
        })
    );
    assert_eq!(written(&dir), 0);
}

#[test]
fn reference_height_itself_is_drawn() {
    let dir = tempfile::tempdir().expect("temporary directory");
    let params = EnWindParams {
        height: 200.0,
        ..EnWindParams::default()
    };
    let outcome = en1991::run(&params, Some(Profile::Roughness), dir.path()).expect("chart drawn");
    assert_eq!(outcome.artifacts(), [dir.path().join("rf.svg")]);
}

#[test]
fn selected_modes_write_their_artifacts() {
    let dir = tempfile::tempdir().expect("temporary directory");
    let out = dir.path();

    let vessel = motions::run(&VesselParams::default(), Some(VesselClass::SmallBarge), out)
        .expect("vessel chart drawn");
    assert_eq!(vessel.artifacts(), [out.join("ves_s.svg")]);

    let plate = yield_line::run(&YieldLineParams::default(), Some(EdgeSupport::Fixed), out)
        .expect("plate chart drawn");
    assert_eq!(plate.artifacts(), [out.join("Pvt_fixed_ends.svg")]);

    let tow = pile_tow::run(&PileTowParams::default(), Some(StressKind::Shear), out)
        .expect("pile tow charts drawn");
    assert_eq!(tow.artifacts().len(), 2);

    for path in vessel.artifacts().iter().chain(plate.artifacts()).chain(tow.artifacts()) {
        assert!(path.exists(), "{} missing", path.display());
    }
}

#[test]
fn unknown_option_is_rejected_before_running() {
    let mut overrides = Overrides::new();
    overrides.set("hieght", 140.0);
    let error = resolve::<EnWindParams>(&overrides).expect_err("misspelt option");
    assert_eq!(error, ConfigurationError::UnknownOption("hieght".to_string()));
}
