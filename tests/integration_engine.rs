mod common;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::{
    assert_close, default_engine, default_settings, ixelles_input, liege_input, paris_input,
};
use solar_roi::engine::types::CountryCode;
use solar_roi::engine::{
    BelgianRegion, Estimator, Payback, WhatIf, calculate_recommended_system,
    classify_belgian_region,
};
use solar_roi::settings::{SettingMap, keys};

#[test]
fn paris_household_gets_six_kwc() {
    let r = calculate_recommended_system(&paris_input(), &default_settings(), &default_engine())
        .expect("estimate should succeed");

    assert_eq!(r.system_size, 6.0);
    assert_close(r.annual_production, 6600.0);
    assert_close(r.total_cost, 10_800.0);
    assert_close(r.breakdown.premium, 960.0);
    assert_close(r.net_cost, 9840.0);
    assert_close(r.annual_savings, 801.9 + 471.9);
    assert!(r.details.region.is_none());

    let years = r.roi_years.years().expect("payback should be computable");
    assert!((years - 9840.0 / 1273.8).abs() < 1e-9);
}

#[test]
fn ixelles_household_pays_tax_and_gets_certificates() {
    let r = calculate_recommended_system(&ixelles_input(), &default_settings(), &default_engine())
        .expect("estimate should succeed");

    assert_eq!(r.system_size, 3.0);
    assert_eq!(r.details.region, Some(BelgianRegion::Bruxelles));
    assert_close(r.breakdown.prosumer_tax, 264.0);
    assert_close(r.net_cost, 4500.0 - 1500.0);
    assert_close(r.annual_savings, 421.8 + 85.5 - 264.0);
}

#[test]
fn liege_household_has_no_certificates() {
    let r = calculate_recommended_system(&liege_input(), &default_settings(), &default_engine())
        .expect("estimate should succeed");

    assert_eq!(r.system_size, 6.0);
    assert_eq!(r.details.region, Some(BelgianRegion::Wallonie));
    assert_close(r.net_cost, r.total_cost);
    assert_close(r.breakdown.prosumer_tax, 528.0);
}

#[test]
fn identical_calls_give_identical_results() {
    let settings = default_settings();
    let config = default_engine();
    for input in [paris_input(), ixelles_input(), liege_input()] {
        let a = calculate_recommended_system(&input, &settings, &config).unwrap();
        let b = calculate_recommended_system(&input, &settings, &config).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn tier_boundaries_belong_to_the_lower_tier() {
    // 0.375 €/kWh keeps bill * 12 / price exact in binary floating point
    let settings = SettingMap::new().with(keys::FR_ELECTRICITY_PRICE, 0.375);
    let config = default_engine();
    let size_for = |bill: f64| {
        let mut input = paris_input();
        input.monthly_bill = bill;
        calculate_recommended_system(&input, &settings, &config)
            .unwrap()
            .system_size
    };

    assert_eq!(size_for(60.0), 2.5);
    assert_eq!(size_for(60.01), 3.0);
    assert_eq!(size_for(109.375), 3.0);
    assert_eq!(size_for(109.5), 6.0);
    assert_eq!(size_for(250.0), 6.0);
    assert_eq!(size_for(250.1), 9.0);
}

#[test]
fn size_never_decreases_as_bill_grows() {
    let mut rng = StdRng::seed_from_u64(42);
    let settings = default_settings();
    let config = default_engine();

    for country in [CountryCode::Fr, CountryCode::Be] {
        let mut bills: Vec<f64> = (0..200).map(|_| rng.random_range(0.0..600.0)).collect();
        bills.sort_by(f64::total_cmp);

        let mut previous = 0.0;
        for bill in bills {
            let mut input = paris_input();
            input.country_code = country;
            input.monthly_bill = bill;
            let r = calculate_recommended_system(&input, &settings, &config).unwrap();
            assert!(
                r.system_size >= previous,
                "{country}: size dropped from {previous} to {} at bill {bill:.2}",
                r.system_size
            );
            previous = r.system_size;
        }
    }
}

#[test]
fn production_costs_and_payback_stay_consistent() {
    let mut rng = StdRng::seed_from_u64(7);
    let config = default_engine();

    for _ in 0..300 {
        let mut input = if rng.random_bool(0.5) {
            paris_input()
        } else {
            ixelles_input()
        };
        input.monthly_bill = rng.random_range(0.0..500.0);
        input.pvgis_production_per_kwc = rng.random_range(200.0..1600.0);
        input.with_battery = rng.random_bool(0.5);
        input.future_proof = rng.random_bool(0.2);
        // premiums occasionally above the installation cost
        let settings = SettingMap::new()
            .with(keys::FR_PRIME_AUTOCONSO_9KW, rng.random_range(0.0_f64..3000.0))
            .with(keys::BE_GREEN_CERTS_BRU, rng.random_range(0.0_f64..3000.0));

        let r = calculate_recommended_system(&input, &settings, &config).unwrap();

        assert!(
            (r.annual_production - r.system_size * input.pvgis_production_per_kwc).abs() < 1e-6
        );
        assert!(r.net_cost >= 0.0);
        assert!(r.net_cost <= r.total_cost);
        match r.roi_years {
            Payback::Years(y) => {
                assert!(r.annual_savings > 0.0);
                assert!((y - r.net_cost / r.annual_savings).abs() < 1e-9);
            }
            Payback::NotComputable => assert!(r.annual_savings <= 0.0),
        }
    }
}

#[test]
fn low_yield_in_belgium_is_not_computable() {
    let mut input = ixelles_input();
    input.pvgis_production_per_kwc = 300.0;
    let r = calculate_recommended_system(&input, &default_settings(), &default_engine()).unwrap();

    assert!(r.annual_savings < 0.0);
    assert_eq!(r.roi_years, Payback::NotComputable);

    let json = serde_json::to_value(&r).unwrap();
    assert!(json["roiYears"].is_null());
}

#[test]
fn region_boundary_is_1299() {
    assert_eq!(classify_belgian_region(1000), BelgianRegion::Bruxelles);
    assert_eq!(classify_belgian_region(1299), BelgianRegion::Bruxelles);
    assert_eq!(classify_belgian_region(1300), BelgianRegion::Wallonie);
    assert_eq!(classify_belgian_region(999), BelgianRegion::Wallonie);
}

#[test]
fn battery_toggle_changes_nothing_else_in_the_input() {
    let estimator = Estimator::new(default_settings());
    let before = paris_input();
    let base = estimator.calculate(&before).unwrap();

    let (after, with_battery) = estimator
        .recalculate(&before, &WhatIf::battery(true))
        .unwrap();

    assert!(after.with_battery);
    let mut expected = before.clone();
    expected.with_battery = true;
    assert_eq!(after, expected);

    assert_eq!(with_battery.system_size, base.system_size);
    assert_close(with_battery.annual_production, base.annual_production);
    assert!(with_battery.annual_savings > base.annual_savings);
}

#[test]
fn orientation_what_if_uses_the_new_yield() {
    let estimator = Estimator::new(default_settings());
    let (next, r) = estimator
        .recalculate(&paris_input(), &WhatIf::orientation(20.0, -30.0, 1000.0))
        .unwrap();

    assert_eq!(next.slope, 20.0);
    assert_eq!(next.azimuth, -30.0);
    assert_close(r.annual_production, 6.0 * 1000.0);
}

#[test]
fn projection_breaks_even_near_simple_payback() {
    let estimator = Estimator::new(default_settings());
    let r = estimator.calculate(&paris_input()).unwrap();
    let projection = estimator.project(&r, 25);

    assert_eq!(projection.years.len(), 25);
    let year = projection
        .break_even_year
        .expect("paris household should break even");
    // inflation only shortens the simple payback
    let simple = r.roi_years.years().unwrap().ceil() as u32;
    assert!(year <= simple);
    assert!(projection.final_net_gain() > 0.0);
}

#[test]
fn zero_battery_uplift_is_a_configuration_error() {
    let mut config = default_engine();
    config.self_consumption.battery_uplift = 0.0;
    let err = calculate_recommended_system(&paris_input(), &default_settings(), &config)
        .unwrap_err();
    assert_eq!(err.subject(), "engine.self_consumption.battery_uplift");
}

#[test]
fn house_number_does_not_override_postal_code() {
    let mut input = liege_input();
    input.address = "Avenue X 1200, 4000 Liège".to_string();
    let r = calculate_recommended_system(&input, &default_settings(), &default_engine()).unwrap();
    assert_eq!(r.details.region, Some(BelgianRegion::Wallonie));
}
