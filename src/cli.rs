//! Command-line surface: one subcommand per calculation.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use offshorex::config::{resolve, Overrides, Parameters};
use offshorex::dispatch::{select_mode, Outcome};
use offshorex::marine::motions::VesselClass;
use offshorex::marine::pile_tow::StressKind;
use offshorex::plate::yield_line::EdgeSupport;
use offshorex::wind::en1991::Profile;
use offshorex::{fatigue, fenders, lifting, marine, plate, register, reliability, tubular, waves, wind};
use offshorex::{CalcError, ConfigurationError};

/// Parsed command line.
#[derive(Parser, Debug)]
#[command(
    name = "offshorex",
    version,
    about = "Closed-form offshore and structural engineering checks"
)]
pub struct Cli {
    /// Directory artifacts are written to.
    #[arg(long, global = true, default_value = ".")]
    pub out_dir: PathBuf,
    /// JSON object of parameter overrides for the chosen command.
    #[arg(long, global = true)]
    pub params: Option<PathBuf>,
    /// Calculation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per calculation.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// EN 1991-1-4 wind profiles for terrain categories 0 to IV.
    Enwind(EnwindArgs),
    /// ISO 19901-1 gust speed profiles.
    Isowind {
        /// One-hour mean wind speed at 10 m (m/s).
        #[arg(long)]
        speed: Option<f64>,
        /// Top of the profile (m).
        #[arg(long)]
        height: Option<f64>,
    },
    /// Weibull gust speed and wind force densities.
    WindPdf,
    /// Wavelengths and depth classification.
    Wavelength {
        /// Water depth (m).
        #[arg(long)]
        depth: Option<f64>,
        /// Wave period (s); repeat for several.
        #[arg(long = "period")]
        periods: Vec<f64>,
    },
    /// Encounter probability of the design storm.
    StormSafety,
    /// ISO 19902 S-N curves in seawater with cathodic protection.
    SnCurves,
    /// ISO 19902 tubular joint S-N curves.
    TjCurve,
    /// ISO 19902 tubular slenderness and local buckling check.
    Slenderness {
        /// Also write the report to this file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Utilisation under the cosine interaction rule.
    Cosint,
    /// Vortex induced vibration of conductor spans.
    Viv {
        /// Current velocity (m/s).
        #[arg(long)]
        current: Option<f64>,
        /// Wall thickness (m).
        #[arg(long)]
        thickness: Option<f64>,
        /// Marine growth thickness (m).
        #[arg(long)]
        growth: Option<f64>,
        /// Span end condition: fixed, clamped, simply-supported or cantilevered.
        #[arg(long)]
        end: Option<String>,
    },
    /// Inertia forces for the standard vessel classes.
    Vessel(VesselArgs),
    /// Inertia forces for a vessel with its own motions.
    VesselCustom {
        /// Roll angle (deg).
        #[arg(long = "r")]
        roll: Option<f64>,
        /// Pitch angle (deg).
        #[arg(long = "p")]
        pitch: Option<f64>,
        /// Motion periods.
        #[command(flatten)]
        periods: Periods,
    },
    /// Stresses in a pile overhung beyond the stern during tow.
    PileTow(PileTowArgs),
    /// Velocity and depth of a dropped pipe.
    Impact {
        /// Terminal velocity (m/s).
        #[arg(long)]
        terminal_velocity: Option<f64>,
    },
    /// Jacket flooding rate and time.
    Flooding {
        /// Jacket buoyancy (N).
        #[arg(long)]
        buoyancy: Option<f64>,
        /// Projected area (m²).
        #[arg(long)]
        area: Option<f64>,
    },
    /// API Spec 2C against EN 13852-1 minimum hoisting velocity.
    Hoist,
    /// API Spec 2C with IOGP S-618 against EN 13852-1.
    HoistIogp,
    /// Load and resistance densities per region.
    RelPdf {
        /// Seed for reproducible sampling.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Partial action factor or reserve strength against return period.
    RelPra {
        /// 1 for partial action factor, 2 for reserve strength ratio.
        #[arg(long, default_value_t = 1)]
        typ: u32,
    },
    /// Web plate size by yield line theory.
    YieldLine(YieldLineArgs),
    /// Fender performance curves.
    Fenders {
        /// Directory holding the curve CSV files.
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
    },
    /// Master document register sorted by IFR forecast.
    Register {
        /// Register to read.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Export file name.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Profile flags and height for `enwind`.
#[derive(Args, Debug)]
pub struct EnwindArgs {
    /// Turbulence intensity.
    #[arg(short = 'i')]
    intensity: bool,
    /// Turbulent length scale.
    #[arg(short = 'l')]
    length_scale: bool,
    /// Peak velocity pressure.
    #[arg(short = 'p')]
    pressure: bool,
    /// Roughness factor.
    #[arg(short = 'r')]
    roughness: bool,
    /// Height of the structure (m).
    #[arg(long)]
    height: Option<f64>,
}

/// Roll and pitch periods shared by the motion commands.
#[derive(Args, Debug)]
pub struct Periods {
    /// Full cycle roll period (s).
    #[arg(long = "tr")]
    roll_period: Option<f64>,
    /// Full cycle pitch period (s).
    #[arg(long = "tp")]
    pitch_period: Option<f64>,
}

impl Periods {
    /// Period options as overrides.
    fn overrides(&self) -> Overrides {
        let mut overrides = Overrides::new();
        overrides
            .set_some("roll_period", self.roll_period)
            .set_some("pitch_period", self.pitch_period);
        overrides
    }
}

/// Vessel class flags.
#[derive(Args, Debug)]
pub struct VesselArgs {
    /// Large vessel.
    #[arg(short = 'l')]
    large: bool,
    /// Medium vessel.
    #[arg(short = 'm')]
    medium: bool,
    /// Small barge.
    #[arg(short = 's')]
    small_barge: bool,
    /// Small vessel.
    #[arg(short = 'v')]
    small_vessel: bool,
    /// Motion periods.
    #[command(flatten)]
    periods: Periods,
}

/// Stress flags for `pile-tow`.
#[derive(Args, Debug)]
pub struct PileTowArgs {
    /// Bending stresses.
    #[arg(long = "fb")]
    bending: bool,
    /// Shear stresses.
    #[arg(long = "fv")]
    shear: bool,
    /// Motion periods.
    #[command(flatten)]
    periods: Periods,
}

/// Edge support flags for `yield-line`.
#[derive(Args, Debug)]
pub struct YieldLineArgs {
    /// Fixed edges.
    #[arg(short = 'f')]
    fixed: bool,
    /// Supported edges.
    #[arg(short = 's')]
    supported: bool,
}

impl Command {
    /// Parameter overrides given as options of this command.
    fn overrides(&self) -> Overrides {
        let mut overrides = Overrides::new();
        match self {
            Self::Enwind(args) => {
                overrides.set_some("height", args.height);
            }
            Self::Isowind { speed, height } => {
                overrides.set_some("speed", *speed).set_some("height", *height);
            }
            Self::Wavelength { depth, periods } => {
                overrides.set_some("depth", *depth).set_list("periods", periods);
            }
            Self::Viv {
                current,
                thickness,
                growth,
                end,
            } => {
                overrides
                    .set_some("current", *current)
                    .set_some("thickness", *thickness)
                    .set_some("growth_thickness", *growth)
                    .set_some("end", end.clone());
            }
            Self::Vessel(VesselArgs { periods, .. }) | Self::PileTow(PileTowArgs { periods, .. }) => {
                overrides.merge(periods.overrides());
            }
            Self::VesselCustom { roll, pitch, periods } => {
                overrides
                    .merge(periods.overrides())
                    .set_some("roll", *roll)
                    .set_some("pitch", *pitch);
            }
            Self::Impact { terminal_velocity } => {
                overrides.set_some("terminal_velocity", *terminal_velocity);
            }
            Self::Flooding { buoyancy, area } => {
                overrides.set_some("buoyancy", *buoyancy).set_some("projected_area", *area);
            }
            Self::RelPdf { seed } => {
                overrides.set_some("seed", *seed);
            }
            Self::Register { input, output } => {
                let path = |path: &Option<PathBuf>| path.as_ref().map(|path| path.display().to_string());
                overrides.set_some("input", path(input)).set_some("output", path(output));
            }
            Self::WindPdf
            | Self::StormSafety
            | Self::SnCurves
            | Self::TjCurve
            | Self::Slenderness { .. }
            | Self::Cosint
            | Self::Hoist
            | Self::HoistIogp
            | Self::RelPra { .. }
            | Self::YieldLine(_)
            | Self::Fenders { .. } => {}
        }
        overrides
    }
}

impl Cli {
    /// Parameters for the chosen command: defaults, then `--params`, then
    /// the command's own options.
    fn params<P: Parameters>(&self) -> Result<P, ConfigurationError> {
        let mut overrides = match &self.params {
            Some(path) => Overrides::from_json_file(path)?,
            None => Overrides::new(),
        };
        overrides.merge(self.command.overrides());
        resolve(&overrides)
    }
}

/// Resolve parameters for the selected command and run it.
pub fn execute(cli: &Cli) -> Result<Outcome, CalcError> {
    let out: &Path = &cli.out_dir;
    match &cli.command {
        Command::Enwind(args) => {
            let profile = select_mode(&[
                (args.intensity, Profile::TurbulenceIntensity),
                (args.length_scale, Profile::LengthScale),
                (args.pressure, Profile::PeakPressure),
                (args.roughness, Profile::Roughness),
            ]);
            wind::en1991::run(&cli.params()?, profile, out)
        }
        Command::Isowind { .. } => wind::iso19901::run(&cli.params()?, out),
        Command::WindPdf => wind::gust_pdf::run(&cli.params()?, out),
        Command::Wavelength { .. } => Ok(waves::wavelength::run(&cli.params()?)),
        Command::StormSafety => waves::storm_safety::run(&cli.params()?, out),
        Command::SnCurves => fatigue::sn::run_catalogue(&cli.params()?, out),
        Command::TjCurve => fatigue::sn::run_tubular_joint(&cli.params()?, out),
        Command::Slenderness { output } => tubular::slenderness::run(&cli.params()?, output.as_deref()),
        Command::Cosint => tubular::interaction::run(&cli.params()?, out),
        Command::Viv { .. } => tubular::viv::run(&cli.params()?, out),
        Command::Vessel(args) => {
            let class = select_mode(&[
                (args.large, VesselClass::Large),
                (args.medium, VesselClass::Medium),
                (args.small_barge, VesselClass::SmallBarge),
                (args.small_vessel, VesselClass::SmallVessel),
            ]);
            marine::motions::run(&cli.params()?, class, out)
        }
        Command::VesselCustom { .. } => marine::motions::run_custom(&cli.params()?, out),
        Command::PileTow(args) => {
            let kind = select_mode(&[(args.bending, StressKind::Bending), (args.shear, StressKind::Shear)]);
            marine::pile_tow::run(&cli.params()?, kind, out)
        }
        Command::Impact { .. } => marine::dropped_object::run(&cli.params()?, out),
        Command::Flooding { .. } => marine::flooding::run(&cli.params()?, out),
        Command::Hoist => lifting::hoist::run(&cli.params()?, out),
        Command::HoistIogp => lifting::hoist::run_iogp(&cli.params()?, out),
        Command::RelPdf { .. } => reliability::density::run(&cli.params()?, out),
        Command::RelPra { typ } => reliability::partial_factor::run(&cli.params()?, *typ, out),
        Command::YieldLine(args) => {
            let support = select_mode(&[(args.fixed, EdgeSupport::Fixed), (args.supported, EdgeSupport::Supported)]);
            plate::yield_line::run(&cli.params()?, support, out)
        }
        Command::Fenders { data_dir } => fenders::run(&cli.params()?, data_dir, out),
        Command::Register { .. } => register::run(&cli.params()?, out),
    }
}

#[cfg(test)]
mod tests {
    use offshorex::marine::flooding::FloodingParams;
    use offshorex::marine::motions::CustomVesselParams;
    use clap::CommandFactory;
    use offshorex::tubular::viv::{EndCondition, VivParams};

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("offshorex").chain(args.iter().copied())).expect("valid command line")
    }

    fn expected(pairs: &[(&str, serde_json::Value)]) -> Overrides {
        let mut overrides = Overrides::new();
        for (name, value) in pairs {
            overrides.set(name, value.clone());
        }
        overrides
    }

    #[test]
    fn flooding_area_sets_projected_area() {
        let cli = parse(&["flooding", "--area", "12.5", "--buoyancy", "3e6"]);
        assert_eq!(
            cli.command.overrides(),
            expected(&[("buoyancy", 3.0e6.into()), ("projected_area", 12.5.into())])
        );
        let params: FloodingParams = cli.params().expect("overrides resolve");
        assert!((params.projected_area - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn viv_growth_and_end_reach_their_options() {
        let cli = parse(&["viv", "--growth", "0.05", "--end", "simply-supported"]);
        assert_eq!(
            cli.command.overrides(),
            expected(&[("growth_thickness", 0.05.into()), ("end", "simply-supported".into())])
        );
        let params: VivParams = cli.params().expect("overrides resolve");
        assert_eq!(params.end, EndCondition::SimplySupported);
    }

    #[test]
    fn custom_vessel_takes_angles_and_periods() {
        let cli = parse(&["vessel-custom", "--r", "20", "--p", "12.5", "--tr", "8"]);
        assert_eq!(
            cli.command.overrides(),
            expected(&[
                ("roll_period", 8.0.into()),
                ("roll", 20.0.into()),
                ("pitch", 12.5.into()),
            ])
        );
        let params: CustomVesselParams = cli.params().expect("overrides resolve");
        assert!((params.roll - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn repeated_periods_form_a_list() {
        let cli = parse(&["wavelength", "--period", "6", "--period", "8"]);
        assert_eq!(cli.command.overrides(), expected(&[("periods", vec![6.0, 8.0].into())]));
    }

    #[test]
    fn mode_flags_are_not_parameters() {
        for args in [&["pile-tow", "--fb", "--fv"][..], &["rel-pra", "--typ", "2"], &["yield-line", "-f"]] {
            assert!(parse(args).command.overrides().is_empty());
        }
    }

    #[test]
    fn several_modes_select_nothing() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let out = dir.path().to_str().expect("utf-8 path");
        for args in [
            &["pile-tow", "--fb", "--fv", "--out-dir", out][..],
            &["yield-line", "-f", "-s", "--out-dir", out],
            &["vessel", "-l", "-m", "--out-dir", out],
            &["rel-pra", "--typ", "3", "--out-dir", out],
        ] {
            let outcome = execute(&parse(args)).expect("runs cleanly");
            assert!(matches!(outcome, Outcome::NoSelection { .. }), "{args:?}");
        }
        assert_eq!(std::fs::read_dir(dir.path()).expect("readable").count(), 0);
    }

    #[test]
    fn help_names_the_governing_standard() {
        let command = Cli::command();
        for name in ["sn-curves", "tj-curve", "slenderness"] {
            let about = command
                .find_subcommand(name)
                .and_then(|sub| sub.get_about())
                .map(ToString::to_string)
                .unwrap_or_default();
            assert!(about.starts_with("ISO 19902"), "{name}: {about}");
        }
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["offshorex", "flooding", "--volume", "3"]).is_err());
    }
}
