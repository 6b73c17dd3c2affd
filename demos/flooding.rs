use std::path::Path;

use offshorex::config::{resolve, Overrides};
use offshorex::marine::flooding::{self, FloodingParams};
use offshorex::sweep::Sweep;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut overrides = Overrides::new();
    overrides.set("buoyancy", 32000e3);
    let params: FloodingParams = resolve(&overrides)?;

    println!("head = {:.3} m", flooding::head(&params));
    println!("v = {:.3} m/s", flooding::ingress_velocity(&params));

    let holes = Sweep::from(vec![0.025, 0.050, 0.100]);
    let flow = flooding::flow_rate(&params, &holes);
    for compartment in &params.compartments {
        let hours = flooding::time_to_flood(compartment.volume, &flow);
        println!("{:<24} {:>8.2} {:>8.2} {:>8.2} h", compartment.name, hours[0], hours[1], hours[2]);
    }

    flooding::run(&params, Path::new("."))?;
    Ok(())
}
