use agendaiq_repeat::repeat::{RepeatConfig, RepeatConfigPayload, generate_series};
use chrono::NaiveDateTime;

pub struct SeriesCase {
    pub name: &'static str,
    pub start: Option<&'static str>,
    pub config: &'static str,
    pub expected: Option<&'static [&'static str]>,
    pub expected_len: Option<usize>,
}

#[expect(clippy::too_many_lines)]
pub fn series_cases() -> Vec<SeriesCase> {
    vec![
        SeriesCase {
            name: "weekly_from_monday",
            start: Some("2024-01-01T10:00:00"),
            config: r#"{"pattern":"weekly","endType":"after","occurrences":4}"#,
            expected: Some(&[
                "2024-01-01T10:00:00",
                "2024-01-08T10:00:00",
                "2024-01-15T10:00:00",
                "2024-01-22T10:00:00",
            ]),
            expected_len: None,
        },
        SeriesCase {
            name: "daily_every_other_day",
            start: Some("2024-02-27T08:30:00"),
            config: r#"{"pattern":"daily","interval":2,"endType":"after","occurrences":3}"#,
            expected: Some(&[
                "2024-02-27T08:30:00",
                "2024-02-29T08:30:00",
                "2024-03-02T08:30:00",
            ]),
            expected_len: None,
        },
        SeriesCase {
            name: "biweekly_ignores_interval",
            start: Some("2024-01-05T14:00:00"),
            config: r#"{"pattern":"biweekly","interval":5,"endType":"after","occurrences":3}"#,
            expected: Some(&[
                "2024-01-05T14:00:00",
                "2024-01-19T14:00:00",
                "2024-02-02T14:00:00",
            ]),
            expected_len: None,
        },
        SeriesCase {
            name: "month_day_31_non_leap",
            start: Some("2023-01-31T09:00:00"),
            config: r#"{"pattern":"monthly","monthDay":31,"endType":"after","occurrences":3}"#,
            expected: Some(&[
                "2023-01-31T09:00:00",
                "2023-02-28T09:00:00",
                "2023-03-31T09:00:00",
            ]),
            expected_len: None,
        },
        SeriesCase {
            name: "month_day_31_leap",
            start: Some("2024-01-31T09:00:00"),
            config: r#"{"pattern":"monthly","monthDay":31,"endType":"after","occurrences":3}"#,
            expected: Some(&[
                "2024-01-31T09:00:00",
                "2024-02-29T09:00:00",
                "2024-03-31T09:00:00",
            ]),
            expected_len: None,
        },
        SeriesCase {
            name: "first_monday_of_month",
            start: Some("2024-01-01T16:00:00"),
            config: r#"{"pattern":"monthly","monthWeek":1,"monthWeekDay":1,"endType":"after","occurrences":4}"#,
            expected: Some(&[
                "2024-01-01T16:00:00",
                "2024-02-05T16:00:00",
                "2024-03-04T16:00:00",
                "2024-04-01T16:00:00",
            ]),
            expected_len: None,
        },
        SeriesCase {
            name: "last_friday_of_month",
            start: Some("2024-01-26T12:00:00"),
            config: r#"{"pattern":"monthly","monthWeek":-1,"monthWeekDay":5,"endType":"after","occurrences":3}"#,
            expected: Some(&[
                "2024-01-26T12:00:00",
                "2024-02-23T12:00:00",
                "2024-03-29T12:00:00",
            ]),
            expected_len: None,
        },
        SeriesCase {
            name: "custom_mon_wed_fri",
            start: Some("2024-01-01T07:45:00"),
            config: r#"{"pattern":"custom","weekDays":[1,3,5],"endType":"after","occurrences":6}"#,
            expected: Some(&[
                "2024-01-01T07:45:00",
                "2024-01-03T07:45:00",
                "2024-01-05T07:45:00",
                "2024-01-08T07:45:00",
                "2024-01-10T07:45:00",
                "2024-01-12T07:45:00",
            ]),
            expected_len: None,
        },
        SeriesCase {
            name: "by_end_date_inclusive_of_day",
            start: Some("2024-01-01T10:00:00"),
            config: r#"{"pattern":"weekly","endType":"by","endDate":"2024-01-29"}"#,
            expected: Some(&[
                "2024-01-01T10:00:00",
                "2024-01-08T10:00:00",
                "2024-01-15T10:00:00",
                "2024-01-22T10:00:00",
                "2024-01-29T10:00:00",
            ]),
            expected_len: None,
        },
        SeriesCase {
            name: "holiday_consumes_occurrence",
            start: Some("2024-12-18T10:00:00"),
            config: r#"{"pattern":"weekly","endType":"after","occurrences":3,"exceptions":["2024-12-25","not-a-date"]}"#,
            expected: Some(&["2024-12-18T10:00:00", "2025-01-01T10:00:00"]),
            expected_len: None,
        },
        SeriesCase {
            name: "never_capped",
            start: Some("2024-01-01T10:00:00"),
            config: r#"{"pattern":"daily","endType":"never"}"#,
            expected: None,
            expected_len: Some(52),
        },
        SeriesCase {
            name: "by_with_garbage_end_capped",
            start: Some("2024-01-01T10:00:00"),
            config: r#"{"pattern":"weekly","endType":"by","endDate":"someday"}"#,
            expected: None,
            expected_len: Some(52),
        },
        SeriesCase {
            name: "missing_start",
            start: None,
            config: r#"{"pattern":"weekly","endType":"after","occurrences":5}"#,
            expected: Some(&[]),
            expected_len: None,
        },
        SeriesCase {
            name: "unparseable_start",
            start: Some("next tuesday"),
            config: r#"{"pattern":"weekly","endType":"after","occurrences":5}"#,
            expected: Some(&[]),
            expected_len: None,
        },
    ]
}

pub fn assert_case(case: &SeriesCase) {
    let payload: RepeatConfigPayload = serde_json::from_str(case.config)
        .unwrap_or_else(|err| panic!("Failed to parse {}: {}", case.name, err));
    let config = RepeatConfig::try_from(&payload)
        .unwrap_or_else(|err| panic!("Invalid config for {}: {}", case.name, err));

    let dates = generate_series(case.start, &config, chrono_tz::UTC);

    assert!(
        dates.windows(2).all(|pair| pair[0] < pair[1]),
        "Case {} is not strictly increasing",
        case.name
    );
    assert!(
        dates.iter().all(|date| !config.exceptions.contains(*date)),
        "Case {} emitted an exception date",
        case.name
    );

    if let Some(expected) = case.expected {
        let expected_dates: Vec<NaiveDateTime> =
            expected.iter().map(|value| parse_naive(value)).collect();
        assert_eq!(dates, expected_dates, "Case {} did not match", case.name);
    }

    if let Some(expected_len) = case.expected_len {
        assert_eq!(
            dates.len(),
            expected_len,
            "Case {} expected {} occurrences",
            case.name,
            expected_len
        );
    }
}

fn parse_naive(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .unwrap_or_else(|err| panic!("Failed to parse naive value {value}: {err}"))
}
