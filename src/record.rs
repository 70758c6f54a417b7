#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumericField {
    Aqi,
    So2,
    Co,
    No,
    WindSpeed,
    Co8hr,
    Pm25Avg,
    So2Avg,
    O3,
    O38hr,
    Pm10,
    Pm25,
    No2,
    Nox,
    WindDirec,
    Pm10Avg,
    SiteId,
    Longitude,
    Latitude,
}

impl NumericField {
    pub const ALL: [NumericField; 19] = [
        NumericField::Aqi,
        NumericField::So2,
        NumericField::Co,
        NumericField::No,
        NumericField::WindSpeed,
        NumericField::Co8hr,
        NumericField::Pm25Avg,
        NumericField::So2Avg,
        NumericField::O3,
        NumericField::O38hr,
        NumericField::Pm10,
        NumericField::Pm25,
        NumericField::No2,
        NumericField::Nox,
        NumericField::WindDirec,
        NumericField::Pm10Avg,
        NumericField::SiteId,
        NumericField::Longitude,
        NumericField::Latitude,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericField::Aqi => "aqi",
            NumericField::So2 => "so2",
            NumericField::Co => "co",
            NumericField::No => "no",
            NumericField::WindSpeed => "wind_speed",
            NumericField::Co8hr => "co_8hr",
            NumericField::Pm25Avg => "pm2_5_avg",
            NumericField::So2Avg => "so2_avg",
            NumericField::O3 => "o3",
            NumericField::O38hr => "o3_8hr",
            NumericField::Pm10 => "pm10",
            NumericField::Pm25 => "pm2_5",
            NumericField::No2 => "no2",
            NumericField::Nox => "nox",
            NumericField::WindDirec => "wind_direc",
            NumericField::Pm10Avg => "pm10_avg",
            NumericField::SiteId => "site_id",
            NumericField::Longitude => "longitude",
            NumericField::Latitude => "latitude",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextField {
    SiteName,
    County,
    Pollutant,
    Status,
    PublishTime,
}

impl TextField {
    pub const ALL: [TextField; 5] = [
        TextField::SiteName,
        TextField::County,
        TextField::Pollutant,
        TextField::Status,
        TextField::PublishTime,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TextField::SiteName => "site_name",
            TextField::County => "county",
            TextField::Pollutant => "pollutant",
            TextField::Status => "status",
            TextField::PublishTime => "publish_time",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    pub aqi: Option<f64>,
    pub so2: Option<f64>,
    pub co: Option<f64>,
    pub no: Option<f64>,
    pub wind_speed: Option<f64>,
    pub co_8hr: Option<f64>,
    pub pm2_5_avg: Option<f64>,
    pub so2_avg: Option<f64>,
    pub o3: Option<f64>,
    pub o3_8hr: Option<f64>,
    pub pm10: Option<f64>,
    pub pm2_5: Option<f64>,
    pub no2: Option<f64>,
    pub nox: Option<f64>,
    pub wind_direc: Option<f64>,
    pub pm10_avg: Option<f64>,
    pub site_id: Option<f64>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub site_name: Option<String>,
    pub county: Option<String>,
    pub pollutant: Option<String>,
    pub status: Option<String>,
    pub publish_time: Option<String>,
}

impl Record {
    pub fn number(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::Aqi => self.aqi,
            NumericField::So2 => self.so2,
            NumericField::Co => self.co,
            NumericField::No => self.no,
            NumericField::WindSpeed => self.wind_speed,
            NumericField::Co8hr => self.co_8hr,
            NumericField::Pm25Avg => self.pm2_5_avg,
            NumericField::So2Avg => self.so2_avg,
            NumericField::O3 => self.o3,
            NumericField::O38hr => self.o3_8hr,
            NumericField::Pm10 => self.pm10,
            NumericField::Pm25 => self.pm2_5,
            NumericField::No2 => self.no2,
            NumericField::Nox => self.nox,
            NumericField::WindDirec => self.wind_direc,
            NumericField::Pm10Avg => self.pm10_avg,
            NumericField::SiteId => self.site_id,
            NumericField::Longitude => self.longitude,
            NumericField::Latitude => self.latitude,
        }
    }

    pub fn text(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::SiteName => self.site_name.as_deref(),
            TextField::County => self.county.as_deref(),
            TextField::Pollutant => self.pollutant.as_deref(),
            TextField::Status => self.status.as_deref(),
            TextField::PublishTime => self.publish_time.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Record::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_empty() {
        assert!(Record::default().is_empty());

        let record = Record {
            aqi: Some(42.0),
            ..Record::default()
        };
        assert!(!record.is_empty());
    }

    #[test]
    fn numeric_accessor_covers_every_field() {
        let mut record = Record::default();
        record.aqi = Some(0.0);
        record.so2 = Some(1.0);
        record.co = Some(2.0);
        record.no = Some(3.0);
        record.wind_speed = Some(4.0);
        record.co_8hr = Some(5.0);
        record.pm2_5_avg = Some(6.0);
        record.so2_avg = Some(7.0);
        record.o3 = Some(8.0);
        record.o3_8hr = Some(9.0);
        record.pm10 = Some(10.0);
        record.pm2_5 = Some(11.0);
        record.no2 = Some(12.0);
        record.nox = Some(13.0);
        record.wind_direc = Some(14.0);
        record.pm10_avg = Some(15.0);
        record.site_id = Some(16.0);
        record.longitude = Some(17.0);
        record.latitude = Some(18.0);

        for (index, field) in NumericField::ALL.iter().enumerate() {
            assert_eq!(record.number(*field), Some(index as f64), "{}", field.name());
        }
    }

    #[test]
    fn text_accessor_covers_every_field() {
        let record = Record {
            site_name: Some("a".to_string()),
            county: Some("b".to_string()),
            pollutant: Some("c".to_string()),
            status: Some("d".to_string()),
            publish_time: Some("e".to_string()),
            ..Record::default()
        };

        let expected = ["a", "b", "c", "d", "e"];
        for (index, field) in TextField::ALL.iter().enumerate() {
            assert_eq!(record.text(*field), Some(expected[index]), "{}", field.name());
        }
    }

    #[test]
    fn unset_fields_stay_unset() {
        let record = Record::default();
        for field in NumericField::ALL {
            assert_eq!(record.number(field), None);
        }
        for field in TextField::ALL {
            assert_eq!(record.text(field), None);
        }
    }
}
