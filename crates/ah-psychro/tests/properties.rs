//! Reference values and algebraic properties of the moist-air model.

use ah_core::{Tolerances, nearly_equal};
use ah_psychro::{
    PropertyCalculator, PsychroError, PsychrometricConstants, ResolveOptions, StateInput,
    StatePointResolver,
};
use proptest::prelude::*;

const P_STD: f64 = 101.325;

#[test]
fn ashrae_reference_point_26c_50pct() {
    let constants = PsychrometricConstants::standard();
    let calc = PropertyCalculator::new(&constants, P_STD).unwrap();
    let resolver = StatePointResolver::new(calc);

    let out = resolver
        .resolve_input(
            "room",
            StateInput::DryBulbRh {
                dry_bulb: 26.0,
                relative_humidity: 50.0,
            },
            ResolveOptions::with_wet_bulb(),
        )
        .unwrap();
    let p = out.point.properties;

    // ASHRAE tables: W = 0.01050 kg/kg', h = 52.9 kJ/kg', v = 0.8617 m³/kg'
    let w = p.humidity.unwrap();
    let h = p.enthalpy.unwrap();
    assert!((w - 0.0105).abs() / 0.0105 < 0.01, "humidity {w}");
    assert!((h - 52.9).abs() / 52.9 < 0.01, "enthalpy {h}");
    assert!((p.specific_volume.unwrap() - 0.8617).abs() < 0.002);
    assert!((p.dew_point.unwrap() - 14.8).abs() < 0.3);
    assert!((p.wet_bulb.unwrap() - 18.7).abs() < 0.3);
    assert!(out.diagnostics.is_empty());
}

#[test]
fn saturation_boundary_is_exact() {
    let constants = PsychrometricConstants::standard();
    let calc = PropertyCalculator::new(&constants, P_STD).unwrap();
    for t in [-20.0, 0.0, 5.0, 20.0, 35.0] {
        let pws = calc.saturation_vapor_pressure(t).unwrap();
        let expected = constants.molecular_weight_ratio * pws / (P_STD - pws);
        assert_eq!(calc.absolute_humidity(t, 100.0).unwrap(), expected);
    }
}

#[test]
fn wet_bulb_above_dry_bulb_never_resolves() {
    let constants = PsychrometricConstants::standard();
    let calc = PropertyCalculator::new(&constants, P_STD).unwrap();
    let resolver = StatePointResolver::new(calc);

    let result = resolver.resolve_input(
        "bad",
        StateInput::DryBulbWetBulb {
            dry_bulb: 20.0,
            wet_bulb: 24.0,
        },
        ResolveOptions::default(),
    );
    assert!(matches!(
        result,
        Err(PsychroError::OutOfPhysicalRange { .. } | PsychroError::ConvergenceFailure { .. })
    ));
}

#[test]
fn lower_pressure_raises_humidity() {
    let constants = PsychrometricConstants::standard();
    let sea = PropertyCalculator::new(&constants, P_STD).unwrap();
    let high = PropertyCalculator::new(&constants, 84.0).unwrap();
    let w_sea = sea.absolute_humidity(25.0, 60.0).unwrap();
    let w_high = high.absolute_humidity(25.0, 60.0).unwrap();
    assert!(w_high > w_sea);
    assert!(high.specific_volume(25.0, w_high).unwrap() > sea.specific_volume(25.0, w_sea).unwrap());
}

#[test]
fn resolution_is_deterministic() {
    let constants = PsychrometricConstants::standard();
    let calc = PropertyCalculator::new(&constants, P_STD).unwrap();
    let resolver = StatePointResolver::new(calc);
    let input = StateInput::DryBulbWetBulb {
        dry_bulb: 33.0,
        wet_bulb: 27.0,
    };
    let a = resolver
        .resolve_input("oa", input, ResolveOptions::with_wet_bulb())
        .unwrap();
    let b = resolver
        .resolve_input("oa", input, ResolveOptions::with_wet_bulb())
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn near_zero_rh_round_trips() {
    let constants = PsychrometricConstants::standard();
    let calc = PropertyCalculator::new(&constants, P_STD).unwrap();
    let resolver = StatePointResolver::new(calc);

    let w = calc.absolute_humidity(20.0, 0.01).unwrap();
    let back = resolver
        .resolve_input(
            "p",
            StateInput::DryBulbHumidity { dry_bulb: 20.0, humidity: w },
            ResolveOptions::default(),
        )
        .unwrap();
    let rh = back.point.properties.relative_humidity.unwrap();
    assert!((rh - 0.01).abs() < 1e-9, "rh={rh}");
    assert_eq!(back.point.properties.dew_point, None);
}

proptest! {
    #[test]
    fn rh_round_trips_through_humidity(t in -20.0_f64..40.0, rh in 0.001_f64..99.5) {
        let constants = PsychrometricConstants::standard();
        let calc = PropertyCalculator::new(&constants, P_STD).unwrap();
        let resolver = StatePointResolver::new(calc);

        let w = calc.absolute_humidity(t, rh).unwrap();
        let back = resolver
            .resolve_input(
                "p",
                StateInput::DryBulbHumidity { dry_bulb: t, humidity: w },
                ResolveOptions::default(),
            )
            .unwrap();
        let tol = Tolerances::uniform(constants.convergence_tolerance * 100.0);
        prop_assert!(nearly_equal(back.point.properties.relative_humidity.unwrap(), rh, tol));
    }

    #[test]
    fn humidity_increases_with_rh(t in -20.0_f64..40.0, rh in 0.5_f64..98.0, step in 0.1_f64..2.0) {
        let constants = PsychrometricConstants::standard();
        let calc = PropertyCalculator::new(&constants, P_STD).unwrap();
        let lo = calc.absolute_humidity(t, rh).unwrap();
        let hi = calc.absolute_humidity(t, rh + step).unwrap();
        prop_assert!(hi > lo);
    }

    #[test]
    fn wet_bulb_lies_between_dew_point_and_dry_bulb(t in 5.0_f64..40.0, rh in 5.0_f64..95.0) {
        let constants = PsychrometricConstants::standard();
        let calc = PropertyCalculator::new(&constants, P_STD).unwrap();
        let w = calc.absolute_humidity(t, rh).unwrap();
        let twb = calc.wet_bulb_from_humidity(t, w).unwrap();
        let td = calc.dew_point(w).unwrap();
        prop_assert!(twb <= t + 1e-9);
        prop_assert!(twb >= td - 1e-6);
    }
}
