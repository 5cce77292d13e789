//! Runs Business-as-Usual and an early-technology scenario and compares them.
//!
//! ```sh
//! RUST_LOG=world3=debug cargo run -p world3 --example scenarios
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use world3::{Results, World3, World3Config};

fn main() -> Result<(), world3::Error> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "world3=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let standard = World3::simulate(World3Config::default())?;
    report("Business as usual", &standard);

    // Earlier resource and pollution technology, with half again the resources.
    let config = World3Config {
        pyear_res_tech: 1985.0,
        pyear_pp_tech: 1985.0,
        ..World3Config::default()
    };
    let mut world = World3::new(config)?;
    world.init_constants(&[("nri", 1.5e12)])?;
    world.init_variables()?;
    world.set_table_functions()?;
    world.set_delay_functions()?;
    world.run()?;
    let early_tech = world.results()?;
    report("Early technology", &early_tech);

    println!("\nChange at 2100 versus business as usual:");
    for name in ["pop", "iopc", "ppolx", "hwi"] {
        if let (Some(base), Some(alt)) = (standard.last(name), early_tech.last(name)) {
            println!("  {name:<6} {:>+8.1}%", 100.0 * (alt - base) / base);
        }
    }
    Ok(())
}

fn report(title: &str, results: &Results) {
    let at_end = |name: &str| results.last(name).unwrap_or(f64::NAN);

    println!("\n{title}, year {}", results.time()[results.len() - 1]);
    println!("  population             {:>16.0}", at_end("pop"));
    println!("  life expectancy        {:>16.1} years", at_end("le"));
    println!("  industrial output/cap  {:>16.2} $/person/year", at_end("iopc"));
    println!("  food per capita        {:>16.2} kg/person/year", at_end("fpc"));
    println!("  pollution index        {:>16.2}", at_end("ppolx"));
    println!("  resources remaining    {:>15.1}%", 100.0 * at_end("nrfr"));
    println!("  human welfare index    {:>16.3}", at_end("hwi"));
    println!("  ecological footprint   {:>16.3}", at_end("hef"));
}
