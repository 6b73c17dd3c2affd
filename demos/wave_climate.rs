use std::path::Path;

use offshorex::config::{resolve, Overrides};
use offshorex::sweep::Sweep;
use offshorex::waves::storm_safety::{self, StormSafetyParams};
use offshorex::waves::wavelength::{self, WavelengthParams};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut overrides = Overrides::new();
    overrides.set("depth", 60.0).set_list("periods", &[7.5, 9.0, 13.0]);
    let site: WavelengthParams = resolve(&overrides)?;
    print!("{}", wavelength::report(&site));

    let exposure: StormSafetyParams = resolve(&Overrides::new())?;
    let design_storm = Sweep::from(vec![10.0, 50.0]);
    for (label, &years) in exposure.labels.iter().zip(&exposure.exposures) {
        let p = storm_safety::encounter_probability(years, &design_storm);
        println!("{label:>8}: {:.2}% (10-year), {:.2}% (50-year)", p[0], p[1]);
    }
    storm_safety::run(&exposure, Path::new("."))?;
    Ok(())
}
