use approx::assert_relative_eq;
use world3::{Results, World3, World3Config};

fn business_as_usual() -> Results {
    World3::simulate(World3Config::default()).unwrap()
}

#[test]
fn business_as_usual_is_fully_defined() {
    let results = business_as_usual();

    assert_eq!(results.len(), 401);
    for (name, values) in results.iter() {
        assert!(
            values.iter().all(|value| value.is_finite()),
            "`{name}` has undefined values"
        );
    }
}

#[test]
fn business_as_usual_population_stays_plausible() {
    let results = business_as_usual();

    let pop = results.get("pop").unwrap();
    assert_relative_eq!(pop[0], 1.6e9);
    assert!(results.value_at("pop", 1950.0).unwrap() > pop[0]);

    let final_pop = results.last("pop").unwrap();
    assert!((1e9..=2e10).contains(&final_pop), "final population {final_pop}");
}

/// Year and value of the largest entry of `name`.
fn peak(results: &Results, name: &str) -> (f64, f64) {
    let series = results.get(name).unwrap();
    let (index, &value) = series
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .unwrap();
    (results.time()[index], value)
}

#[test]
fn business_as_usual_follows_reference_run() {
    let results = business_as_usual();

    assert_relative_eq!(
        results.value_at("pop", 2000.0).unwrap(),
        6.03e9,
        max_relative = 0.03
    );
    assert_relative_eq!(results.last("pop").unwrap(), 3.59e9, max_relative = 0.05);

    let (peak_year, peak_pop) = peak(&results, "pop");
    assert!((2020.0..=2040.0).contains(&peak_year), "population peaks in {peak_year}");
    assert_relative_eq!(peak_pop, 7.6e9, max_relative = 0.05);

    // Overshoot and decline: the peak is well above both ends of the century.
    assert!(peak_pop > 1.5 * results.last("pop").unwrap());

    let final_nrfr = results.last("nrfr").unwrap();
    assert!((0.05..0.5).contains(&final_nrfr), "final nrfr {final_nrfr}");
}

#[test]
fn business_as_usual_depletes_resources() {
    let results = business_as_usual();

    let nrfr = results.get("nrfr").unwrap();
    assert_relative_eq!(nrfr[0], 1.0);
    assert!(nrfr.windows(2).into_iter().all(|w| w[1] <= w[0]));
    assert!(results.last("nrfr").unwrap() < 1.0);
}

#[test]
fn runs_are_deterministic() {
    assert_eq!(business_as_usual(), business_as_usual());
}

#[test]
fn overrides_change_the_trajectory() {
    let baseline = business_as_usual();
    let doubled = World3::simulate_with(World3Config::default(), &[("nri", 2e12)]).unwrap();

    assert_eq!(doubled.value_at("nr", 1900.0), Some(2e12));
    assert_eq!(
        baseline.value_at("pop", 1900.0),
        doubled.value_at("pop", 1900.0)
    );
    assert_ne!(baseline.last("nrfr"), doubled.last("nrfr"));
    assert_ne!(baseline.last("pop"), doubled.last("pop"));
}

#[test]
fn resource_technology_only_acts_after_its_policy_year() {
    let baseline = business_as_usual();
    let config = World3Config {
        pyear_res_tech: 1985.0,
        ..World3Config::default()
    };
    let policy = World3::simulate(config).unwrap();

    for year in [1900.0, 1950.0, 1984.5] {
        assert_eq!(
            baseline.value_at("pop", year),
            policy.value_at("pop", year)
        );
        assert_eq!(policy.value_at("nruf", year), Some(1.0));
    }
    assert!(policy.value_at("nruf", 2100.0).unwrap() < 1.0);
    assert_eq!(baseline.value_at("nruf", 2100.0), Some(1.0));
}

#[test]
fn land_yield_technology_only_acts_after_its_policy_year() {
    let baseline = business_as_usual();
    let config = World3Config {
        pyear_y_tech: 2000.0,
        ..World3Config::default()
    };
    let policy = World3::simulate(config).unwrap();

    for year in [1900.0, 1975.0, 2000.0] {
        assert_eq!(baseline.value_at("pop", year), policy.value_at("pop", year));
        assert_eq!(policy.value_at("lyf", year), Some(1.0));
    }
    assert_eq!(baseline.last("lyf"), Some(1.0));
    assert!(policy.last("lyf").unwrap() > 1.0);
    assert_ne!(baseline.last("fpc"), policy.last("fpc"));
}

#[test]
fn pollution_technology_only_acts_after_its_policy_year() {
    let baseline = business_as_usual();
    let config = World3Config {
        pyear_pp_tech: 2000.0,
        ..World3Config::default()
    };
    let policy = World3::simulate(config).unwrap();

    for year in [1900.0, 1975.0, 2000.0] {
        assert_eq!(baseline.value_at("ppol", year), policy.value_at("ppol", year));
        assert_eq!(policy.value_at("ppgf", year), Some(1.0));
    }
    assert_eq!(baseline.last("ppgf"), Some(1.0));
    assert!(policy.last("ppgf").unwrap() < 1.0);
}

#[test]
fn scenario_loads_from_toml() {
    let config: World3Config = toml::from_str(
        r"
        year_max = 2000.0
        dt = 1.0
        pyear_pp_tech = 1985.0
        ",
    )
    .unwrap();

    let results = World3::simulate(config).unwrap();

    assert_eq!(results.len(), 101);
    assert_eq!(results.time()[100], 2000.0);
    assert_eq!(results.value_at("ppgf", 1980.0), Some(1.0));
}

#[test]
fn scenario_loads_from_json() {
    let config: World3Config =
        serde_json::from_str(r#"{ "year_min": 1900.0, "year_max": 1950.0 }"#).unwrap();

    assert_eq!(config.dt, 0.5);
    assert_eq!(World3::simulate(config).unwrap().len(), 101);
}
