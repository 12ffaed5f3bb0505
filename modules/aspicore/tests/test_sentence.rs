// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use aspicore::sentence::{GgaFix, RmcFix, identity_token, to_decimal_degrees};
use chrono::{NaiveTime, TimeZone, Utc};

fn assert_close(value: f64, expected: f64) {
    assert!(
        (value - expected).abs() < 1e-9,
        "expected {expected}, got {value}"
    );
}

#[test]
pub fn decimal_degrees_from_degrees_and_minutes() {
    assert_close(to_decimal_degrees(27, 39.0, 'N'), 27.65);
    assert_close(to_decimal_degrees(27, 39.0, 'S'), -27.65);
    assert_close(to_decimal_degrees(11, 31.0, 'E'), 11.516666666666667);
    assert_close(to_decimal_degrees(11, 31.0, 'W'), -11.516666666666667);
}

#[test]
pub fn identity_token_from_announcement() {
    assert_eq!(identity_token("IMEI 123456789012345"), Some("123456789012345"));
    assert_eq!(identity_token("IMEI   42"), Some("42"));
    assert_eq!(identity_token("IMEI"), None);
    assert_eq!(identity_token("IMEI123456789012345"), None);
    assert_eq!(identity_token("IMEI 12AB45"), None);
    assert_eq!(identity_token("IMEI "), None);
}

#[test]
pub fn rmc_full_sentence() {
    let fix = RmcFix::parse("$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A")
        .expect("sentence should match the grammar");
    assert_eq!(fix.time, Utc.with_ymd_and_hms(1994, 3, 23, 12, 35, 19).unwrap());
    assert!(fix.valid);
    assert_close(fix.latitude, 48.1173);
    assert_close(fix.longitude, 11.516666666666667);
    assert_close(fix.speed, 22.4);
    assert_close(fix.course, 84.4);
}

#[test]
pub fn rmc_sentence_without_trailing_fields() {
    let fix = RmcFix::parse("$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394")
        .expect("sentence should match the grammar");
    assert_eq!(fix.time, Utc.with_ymd_and_hms(1994, 3, 23, 12, 35, 19).unwrap());
}

#[test]
pub fn rmc_fractional_seconds_are_dropped() {
    let fix = RmcFix::parse("$GPRMC,123519.500,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A")
        .expect("sentence should match the grammar");
    assert_eq!(fix.time, Utc.with_ymd_and_hms(1994, 3, 23, 12, 35, 19).unwrap());
}

#[test]
pub fn rmc_void_fix_still_parses() {
    let fix = RmcFix::parse("$GPRMC,123519,V,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A")
        .expect("sentence should match the grammar");
    assert!(!fix.valid);
}

#[test]
pub fn rmc_missing_speed_and_course_default_to_zero() {
    let fix = RmcFix::parse("$GPRMC,123519,A,4807.038,N,01131.000,E,,,230394,003.1,W*6A")
        .expect("sentence should match the grammar");
    assert_eq!(fix.speed, 0.0);
    assert_eq!(fix.course, 0.0);
}

#[test]
pub fn rmc_southern_and_western_hemispheres_negate() {
    let fix = RmcFix::parse("$GPRMC,123519,A,4807.038,S,01131.000,W,,,230394,003.1,W*6A")
        .expect("sentence should match the grammar");
    assert_close(fix.latitude, -48.1173);
    assert_close(fix.longitude, -11.516666666666667);
}

#[test]
pub fn rmc_record_carries_protocol_and_zero_altitude() {
    let record = RmcFix::parse("$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A")
        .unwrap()
        .into_record(42);
    assert_eq!(record.device_id, 42);
    assert_eq!(record.altitude, 0.0);
    assert_eq!(record.protocol, "aspicore");
}

#[test]
pub fn rmc_malformed_sentences_are_rejected() {
    // wrong validity letter
    assert_eq!(
        RmcFix::parse("$GPRMC,123519,B,4807.038,N,01131.000,E,022.4,084.4,230394,x"),
        None
    );
    // hemisphere letter from the wrong set
    assert_eq!(
        RmcFix::parse("$GPRMC,123519,A,4807.038,E,01131.000,E,022.4,084.4,230394,x"),
        None
    );
    // coordinate without decimal point
    assert_eq!(
        RmcFix::parse("$GPRMC,123519,A,4807038,N,01131.000,E,022.4,084.4,230394,x"),
        None
    );
    // short time field
    assert_eq!(
        RmcFix::parse("$GPRMC,1235,A,4807.038,N,01131.000,E,022.4,084.4,230394,x"),
        None
    );
    // five digit date
    assert_eq!(
        RmcFix::parse("$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,23039,x"),
        None
    );
    // month that does not exist
    assert_eq!(
        RmcFix::parse("$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,231394,x"),
        None
    );
    // junk in the speed field
    assert_eq!(
        RmcFix::parse("$GPRMC,123519,A,4807.038,N,01131.000,E,fast,084.4,230394,x"),
        None
    );
    // too few fields
    assert_eq!(RmcFix::parse("$GPRMC,123519,A,4807.038,N"), None);
    // wrong tag
    assert_eq!(
        RmcFix::parse("$GPVTG,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,x"),
        None
    );
}

#[test]
pub fn gga_full_sentence() {
    let fix = GgaFix::parse("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47")
        .expect("sentence should match the grammar");
    assert_eq!(fix.time, NaiveTime::from_hms_opt(12, 35, 19).unwrap());
    assert!(fix.valid);
    assert_close(fix.latitude, 48.1173);
    assert_close(fix.longitude, 11.516666666666667);
    assert_close(fix.altitude, 592.3);
}

#[test]
pub fn gga_altitude_is_sum_of_geoid_and_separation() {
    let fix = GgaFix::parse("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,100.0,M,-17.0,M,,*47")
        .expect("sentence should match the grammar");
    assert_close(fix.altitude, 83.0);
}

#[test]
pub fn gga_without_age_station_and_checksum() {
    let fix = GgaFix::parse("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,100.0,M,-17.0,M")
        .expect("sentence should match the grammar");
    assert_close(fix.altitude, 83.0);
}

#[test]
pub fn gga_fix_quality_selects_validity() {
    let no_fix = GgaFix::parse("$GPGGA,123519,4807.038,N,01131.000,E,0,08,0.9,100.0,M,-17.0,M,,*47")
        .expect("sentence should match the grammar");
    assert!(!no_fix.valid);
    let dgps_fix = GgaFix::parse("$GPGGA,123519,4807.038,N,01131.000,E,2,08,0.9,100.0,M,-17.0,M,,*47")
        .expect("sentence should match the grammar");
    assert!(dgps_fix.valid);
}

#[test]
pub fn gga_record_reports_no_motion() {
    let decoded_at = Utc.with_ymd_and_hms(2025, 6, 1, 23, 59, 59).unwrap();
    let record = GgaFix::parse("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,100.0,M,-17.0,M,,*47")
        .unwrap()
        .into_record(42, decoded_at);
    assert_eq!(record.speed, 0.0);
    assert_eq!(record.course, 0.0);
    assert_eq!(record.protocol, "aspicore");
    // date from the decoding instant, time of day from the sentence
    assert_eq!(record.time, Utc.with_ymd_and_hms(2025, 6, 1, 12, 35, 19).unwrap());
}

#[test]
pub fn gga_malformed_sentences_are_rejected() {
    // fix quality outside 0..2
    assert_eq!(
        GgaFix::parse("$GPGGA,123519,4807.038,N,01131.000,E,3,08,0.9,100.0,M,-17.0,M,,*47"),
        None
    );
    // two digit fix quality
    assert_eq!(
        GgaFix::parse("$GPGGA,123519,4807.038,N,01131.000,E,12,08,0.9,100.0,M,-17.0,M,,*47"),
        None
    );
    // wrong unit letter
    assert_eq!(
        GgaFix::parse("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,100.0,X,-17.0,M,,*47"),
        None
    );
    // missing geoid separation block
    assert_eq!(GgaFix::parse("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,100.0,M"), None);
    // checksum with non-hex characters
    assert_eq!(
        GgaFix::parse("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,100.0,M,-17.0,M,,*4Z"),
        None
    );
    // junk in the satellite count
    assert_eq!(
        GgaFix::parse("$GPGGA,123519,4807.038,N,01131.000,E,1,eight,0.9,100.0,M,-17.0,M,,*47"),
        None
    );
}
