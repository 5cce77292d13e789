use world3::{Error, Lifecycle, Sector, World3, World3Config};
use world3_core::ConfigurationError;

fn short_run() -> World3Config {
    World3Config::new(1900.0, 2100.0, 1.0)
}

#[test]
fn grid_has_one_step_per_year_plus_one() {
    let world = World3::new(short_run()).unwrap();

    assert_eq!(world.grid().step_count(), 201);
    assert_eq!(world.lifecycle(), Lifecycle::Created);
}

#[test]
fn invalid_bounds_are_rejected_at_construction() {
    assert!(matches!(
        World3::new(World3Config::new(1900.0, 2100.0, -0.5)),
        Err(ConfigurationError::NonPositiveDt { .. })
    ));
    assert!(matches!(
        World3::new(World3Config::new(2000.0, 2000.0, 1.0)),
        Err(ConfigurationError::EmptyHorizon { .. })
    ));
}

#[test]
fn steps_must_run_in_order() {
    let mut world = World3::new(short_run()).unwrap();

    let error = world.init_variables().unwrap_err();
    assert!(matches!(
        error,
        Error::State(state) if state.required == Lifecycle::ConstantsSet
            && state.current == Lifecycle::Created
    ));
    assert!(matches!(world.run(), Err(Error::State(_))));
    assert!(world.results().is_err());

    world.init_constants(&[]).unwrap();
    assert!(matches!(world.init_constants(&[]), Err(Error::State(_))));
    assert!(matches!(world.set_table_functions(), Err(Error::State(_))));

    world.init_variables().unwrap();
    world.set_table_functions().unwrap();
    assert!(matches!(world.run(), Err(Error::State(_))));
    world.set_delay_functions().unwrap();
    assert_eq!(world.lifecycle(), Lifecycle::DelaysSet);
    assert!(world.results().is_err());

    world.run().unwrap();
    assert_eq!(world.lifecycle(), Lifecycle::ResultsReady);
    assert!(matches!(world.run(), Err(Error::State(_))));
}

#[test]
fn state_error_names_the_operation() {
    let mut world = World3::new(short_run()).unwrap();

    let Err(Error::State(error)) = world.set_delay_functions() else {
        panic!("expected a state error");
    };

    assert_eq!(error.required, Lifecycle::TablesSet);
    assert_eq!(
        error.to_string(),
        "cannot set delay functions on world3: requires table functions set, but it is created"
    );
}

#[test]
fn unknown_constant_is_a_configuration_error() {
    let mut world = World3::new(short_run()).unwrap();

    let error = world.init_constants(&[("p1i", 7e8), ("xyz", 1.0)]).unwrap_err();

    assert!(matches!(
        error,
        Error::Configuration(ConfigurationError::UnknownConstant { .. })
    ));
    assert_eq!(world.lifecycle(), Lifecycle::Created);
}

#[test]
fn variables_are_undefined_before_the_run() {
    let mut world = World3::new(short_run()).unwrap();
    world.init_constants(&[]).unwrap();
    world.init_variables().unwrap();

    let population = world.population().variables().unwrap();
    assert_eq!(population.pop.len(), 201);
    assert!(population.pop.iter().all(|value| value.is_nan()));
    assert!(
        world
            .capital()
            .variables()
            .unwrap()
            .io
            .iter()
            .all(|value| value.is_nan())
    );
}

#[test]
fn first_step_holds_initial_constants() {
    let mut world = World3::new(short_run()).unwrap();
    world.init_constants(&[]).unwrap();
    world.init_variables().unwrap();
    world.set_table_functions().unwrap();
    world.set_delay_functions().unwrap();
    world.run().unwrap();

    let results = world.results().unwrap();
    assert_eq!(results.len(), 201);
    assert_eq!(results.get("p1").unwrap()[0], 65e7);
    assert_eq!(results.get("ic").unwrap()[0], 2.1e11);
    assert_eq!(results.get("nr").unwrap()[0], 1e12);
    assert_eq!(results.get("ppol").unwrap()[0], 2.5e7);
    assert_eq!(results.get("al").unwrap()[0], 0.9e9);
    assert_eq!(results.get("time").unwrap()[200], 2100.0);
}
