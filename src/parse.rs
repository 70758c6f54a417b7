use serde::Deserialize;
use thiserror::Error;

use crate::record::Record;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed response body: {0}")]
    Malformed(String),
    #[error("no record for site {0}")]
    NoMatch(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    records: Vec<RawRecord>,
}

// Upstream emits numbers as JSON numbers or strings interchangeably;
// anything else (null, arrays, objects) decodes to unset for that field
// without failing the record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Scalar {
    fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(value) if value.is_finite() => Some(*value),
            Scalar::Number(_) => None,
            Scalar::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            Scalar::Other(_) => None,
        }
    }

    fn as_text(&self) -> Option<String> {
        match self {
            Scalar::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Scalar::Number(value) => Some(value.to_string()),
            Scalar::Other(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    sitename: Option<Scalar>,
    #[serde(default)]
    county: Option<Scalar>,
    #[serde(default)]
    pollutant: Option<Scalar>,
    #[serde(default)]
    status: Option<Scalar>,
    #[serde(default)]
    publishtime: Option<Scalar>,
    #[serde(default)]
    aqi: Option<Scalar>,
    #[serde(default)]
    so2: Option<Scalar>,
    #[serde(default)]
    co: Option<Scalar>,
    #[serde(default)]
    no: Option<Scalar>,
    #[serde(default)]
    wind_speed: Option<Scalar>,
    #[serde(default)]
    co_8hr: Option<Scalar>,
    #[serde(default, rename = "pm2.5_avg")]
    pm2_5_avg: Option<Scalar>,
    #[serde(default)]
    so2_avg: Option<Scalar>,
    #[serde(default)]
    o3: Option<Scalar>,
    #[serde(default)]
    o3_8hr: Option<Scalar>,
    #[serde(default)]
    pm10: Option<Scalar>,
    #[serde(default, rename = "pm2.5")]
    pm2_5: Option<Scalar>,
    #[serde(default)]
    no2: Option<Scalar>,
    #[serde(default)]
    nox: Option<Scalar>,
    #[serde(default)]
    wind_direc: Option<Scalar>,
    #[serde(default)]
    pm10_avg: Option<Scalar>,
    #[serde(default)]
    longitude: Option<Scalar>,
    #[serde(default)]
    latitude: Option<Scalar>,
    #[serde(default)]
    siteid: Option<Scalar>,
}

impl RawRecord {
    fn site_name(&self) -> Option<String> {
        self.sitename.as_ref().and_then(Scalar::as_text)
    }

    fn to_record(&self) -> Record {
        let number = |scalar: &Option<Scalar>| scalar.as_ref().and_then(Scalar::as_number);
        let text = |scalar: &Option<Scalar>| scalar.as_ref().and_then(Scalar::as_text);

        Record {
            aqi: number(&self.aqi),
            so2: number(&self.so2),
            co: number(&self.co),
            no: number(&self.no),
            wind_speed: number(&self.wind_speed),
            co_8hr: number(&self.co_8hr),
            pm2_5_avg: number(&self.pm2_5_avg),
            so2_avg: number(&self.so2_avg),
            o3: number(&self.o3),
            o3_8hr: number(&self.o3_8hr),
            pm10: number(&self.pm10),
            pm2_5: number(&self.pm2_5),
            no2: number(&self.no2),
            nox: number(&self.nox),
            wind_direc: number(&self.wind_direc),
            pm10_avg: number(&self.pm10_avg),
            site_id: number(&self.siteid),
            longitude: number(&self.longitude),
            latitude: number(&self.latitude),
            site_name: text(&self.sitename),
            county: text(&self.county),
            pollutant: text(&self.pollutant),
            status: text(&self.status),
            publish_time: text(&self.publishtime),
        }
    }
}

pub fn parse_and_select(body: &str, expected_site_name: &str) -> Result<Record, ParseError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|err| ParseError::Malformed(err.to_string()))?;

    // First match in document order wins when the feed returns duplicates.
    envelope
        .records
        .iter()
        .find(|raw| raw.site_name().as_deref() == Some(expected_site_name))
        .map(RawRecord::to_record)
        .ok_or_else(|| ParseError::NoMatch(expected_site_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_document_is_rejected() {
        let err = parse_and_select("{not json", "Qianjin").unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn empty_records_array_yields_no_match() {
        let err = parse_and_select(r#"{"records":[]}"#, "Qianjin").unwrap_err();
        assert!(matches!(err, ParseError::NoMatch(_)));
    }

    #[test]
    fn missing_records_key_yields_no_match() {
        let err = parse_and_select(r#"{"total":"0"}"#, "Qianjin").unwrap_err();
        assert!(matches!(err, ParseError::NoMatch(_)));
    }

    #[test]
    fn non_matching_site_yields_no_match() {
        let body = r#"{"records":[{"sitename":"Zuoying","aqi":"40"}]}"#;
        let err = parse_and_select(body, "Qianjin").unwrap_err();
        assert!(matches!(err, ParseError::NoMatch(_)));
    }

    #[test]
    fn site_match_is_case_sensitive() {
        let body = r#"{"records":[{"sitename":"qianjin","aqi":"40"}]}"#;
        assert!(parse_and_select(body, "Qianjin").is_err());
    }

    #[test]
    fn string_numbers_decode_as_numbers() {
        let body = r#"{"records":[{"sitename":"Qianjin","aqi":"42","pm2.5":"10"}]}"#;
        let record = parse_and_select(body, "Qianjin").expect("record should parse");
        assert_eq!(record.aqi, Some(42.0));
        assert_eq!(record.pm2_5, Some(10.0));
        assert_eq!(record.so2, None);
        assert_eq!(record.county, None);
        assert_eq!(record.site_name.as_deref(), Some("Qianjin"));
    }

    #[test]
    fn bad_numeric_field_leaves_only_that_field_unset() {
        let body = r#"{"records":[{"sitename":"Qianjin","aqi":"ND","pm10":"33","wind_direc":[1,2]}]}"#;
        let record = parse_and_select(body, "Qianjin").expect("record should parse");
        assert_eq!(record.aqi, None);
        assert_eq!(record.wind_direc, None);
        assert_eq!(record.pm10, Some(33.0));
    }

    #[test]
    fn first_matching_entry_wins() {
        let body = r#"{"records":[
            {"sitename":"Zuoying","aqi":"1"},
            {"sitename":"Qianjin","aqi":"2"},
            {"sitename":"Qianjin","aqi":"3"}
        ]}"#;
        let record = parse_and_select(body, "Qianjin").expect("record should parse");
        assert_eq!(record.aqi, Some(2.0));
    }

    #[test]
    fn full_feed_entry_parses_field_by_field() {
        let body = r#"{"records":[{
            "sitename":"Qianjin",
            "county":"Kaohsiung City",
            "aqi":"55",
            "pollutant":"O3(8hr)",
            "status":"Moderate",
            "so2":"1.8",
            "co":"0.32",
            "o3":"38.6",
            "o3_8hr":"44",
            "pm10":"39",
            "pm2.5":"17",
            "no2":"9.4",
            "nox":"11.2",
            "no":"1.8",
            "wind_speed":"2.1",
            "wind_direc":"196",
            "publishtime":"2026/08/06 10:00:00",
            "co_8hr":"0.3",
            "pm2.5_avg":"15",
            "pm10_avg":"36",
            "so2_avg":"1",
            "longitude":"120.280022",
            "latitude":"22.632789",
            "siteid":"56"
        }]}"#;

        let record = parse_and_select(body, "Qianjin").expect("record should parse");
        assert_eq!(record.site_name.as_deref(), Some("Qianjin"));
        assert_eq!(record.county.as_deref(), Some("Kaohsiung City"));
        assert_eq!(record.aqi, Some(55.0));
        assert_eq!(record.pollutant.as_deref(), Some("O3(8hr)"));
        assert_eq!(record.status.as_deref(), Some("Moderate"));
        assert_eq!(record.so2, Some(1.8));
        assert_eq!(record.co, Some(0.32));
        assert_eq!(record.o3, Some(38.6));
        assert_eq!(record.o3_8hr, Some(44.0));
        assert_eq!(record.pm10, Some(39.0));
        assert_eq!(record.pm2_5, Some(17.0));
        assert_eq!(record.no2, Some(9.4));
        assert_eq!(record.nox, Some(11.2));
        assert_eq!(record.no, Some(1.8));
        assert_eq!(record.wind_speed, Some(2.1));
        assert_eq!(record.wind_direc, Some(196.0));
        assert_eq!(record.publish_time.as_deref(), Some("2026/08/06 10:00:00"));
        assert_eq!(record.co_8hr, Some(0.3));
        assert_eq!(record.pm2_5_avg, Some(15.0));
        assert_eq!(record.pm10_avg, Some(36.0));
        assert_eq!(record.so2_avg, Some(1.0));
        assert_eq!(record.longitude, Some(120.280022));
        assert_eq!(record.latitude, Some(22.632789));
        assert_eq!(record.site_id, Some(56.0));
    }

    #[test]
    fn plain_json_numbers_also_decode() {
        let body = r#"{"records":[{"sitename":"Qianjin","aqi":42,"pm2.5":10.5}]}"#;
        let record = parse_and_select(body, "Qianjin").expect("record should parse");
        assert_eq!(record.aqi, Some(42.0));
        assert_eq!(record.pm2_5, Some(10.5));
    }

    #[test]
    fn empty_string_text_field_stays_unset() {
        let body = r#"{"records":[{"sitename":"Qianjin","county":"","status":"  "}]}"#;
        let record = parse_and_select(body, "Qianjin").expect("record should parse");
        assert_eq!(record.county, None);
        assert_eq!(record.status, None);
    }
}
