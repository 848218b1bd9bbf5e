#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::parsing::cells::*;
    use chrono::{NaiveDate, Timelike};
    use polars::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_iso_date_and_datetime() {
        let dt = parse_datetime_str("2024-03-05").unwrap();
        assert_eq!(dt.date(), date(2024, 3, 5));
        assert_eq!(dt.hour(), 0);

        let dt = parse_datetime_str("2024-03-05 14:22:01").unwrap();
        assert_eq!(dt.hour(), 14);

        let dt = parse_datetime_str("2024-03-05T08:15:00").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parse_us_and_european_layouts() {
        assert_eq!(parse_datetime_str("03/05/2024").unwrap().date(), date(2024, 3, 5));
        assert_eq!(parse_datetime_str("05.03.2024").unwrap().date(), date(2024, 3, 5));
        assert_eq!(
            parse_datetime_str("03/05/2024 17:45").unwrap().hour(),
            17
        );
    }

    #[test]
    fn test_parse_rfc3339_keeps_local_day() {
        let dt = parse_datetime_str("2024-03-05T23:30:00-05:00").unwrap();
        assert_eq!(dt.date(), date(2024, 3, 5));
        assert_eq!(dt.hour(), 23);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_datetime_str("not a date").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(parse_datetime_str("   ").is_err());
    }

    #[test]
    fn test_cell_to_date_from_typed_date() {
        // 19_787 days after the epoch
        let value = AnyValue::Date(19_787);
        assert_eq!(cell_to_date(&value).unwrap(), date(2024, 3, 5));
    }

    #[test]
    fn test_cell_to_date_from_datetime() {
        let micros = date(2024, 3, 5)
            .and_hms_opt(10, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_micros();
        let value = AnyValue::Datetime(micros, TimeUnit::Microseconds, None);
        assert_eq!(cell_to_date(&value).unwrap(), date(2024, 3, 5));
        assert_eq!(cell_to_hour(&value).unwrap(), 10);
    }

    #[test]
    fn test_cell_to_date_rejects_numbers_and_nulls() {
        assert!(cell_to_date(&AnyValue::Int64(45_000)).is_err());
        assert!(cell_to_date(&AnyValue::Null).is_err());
    }

    #[test]
    fn test_cell_to_f64() {
        assert_eq!(cell_to_f64(&AnyValue::Int64(12)).unwrap(), 12.0);
        assert_eq!(cell_to_f64(&AnyValue::Float64(2.5)).unwrap(), 2.5);
        assert_eq!(cell_to_f64(&AnyValue::String(" 7.25 ")).unwrap(), 7.25);
        assert!(cell_to_f64(&AnyValue::String("n/a")).is_err());
        assert!(cell_to_f64(&AnyValue::Float64(f64::NAN)).is_err());
        assert!(cell_to_f64(&AnyValue::Null).is_err());
    }

    #[test]
    fn test_cell_to_hour_variants() {
        assert_eq!(cell_to_hour(&AnyValue::Int64(9)).unwrap(), 9);
        assert_eq!(cell_to_hour(&AnyValue::Float64(13.0)).unwrap(), 13);
        assert_eq!(cell_to_hour(&AnyValue::String("07:30")).unwrap(), 7);
        assert_eq!(cell_to_hour(&AnyValue::String("18")).unwrap(), 18);
        assert_eq!(
            cell_to_hour(&AnyValue::String("2024-03-05 16:10:00")).unwrap(),
            16
        );
    }

    #[test]
    fn test_cell_to_hour_out_of_range() {
        assert!(cell_to_hour(&AnyValue::Int64(24)).is_err());
        assert!(cell_to_hour(&AnyValue::Int64(-1)).is_err());
        assert!(cell_to_hour(&AnyValue::Float64(9.5)).is_err());
    }

    #[test]
    fn test_cell_to_string_and_label() {
        assert_eq!(cell_to_string(&AnyValue::Null), None);
        assert_eq!(cell_to_string(&AnyValue::String("abc")), Some("abc".to_string()));
        assert_eq!(
            cell_to_string(&AnyValue::Date(19_787)),
            Some("2024-03-05".to_string())
        );
        assert_eq!(cell_to_label(&AnyValue::String("  Alice ")).unwrap(), "Alice");
        assert!(cell_to_label(&AnyValue::String("   ")).is_err());
    }

    #[test]
    fn test_typed_date_out_of_range_is_parse_error() {
        for days in [i32::MAX, i32::MIN] {
            let err = cell_to_date(&AnyValue::Date(days)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse);
        }
        assert_eq!(
            cell_to_string(&AnyValue::Date(i32::MAX)),
            Some(i32::MAX.to_string())
        );
    }
}
