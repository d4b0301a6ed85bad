//! Identification of a single ABI radiance file on the NOAA open-data buckets.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GoesError, GoesResult};

/// GOES-R series satellites with public ABI archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Satellite {
    Goes16,
    Goes17,
    Goes18,
    Goes19,
}

impl Satellite {
    /// Lower-case name as used in bucket names ("goes19").
    pub fn name(&self) -> &'static str {
        match self {
            Satellite::Goes16 => "goes16",
            Satellite::Goes17 => "goes17",
            Satellite::Goes18 => "goes18",
            Satellite::Goes19 => "goes19",
        }
    }

    /// NOAA open-data bucket holding this satellite's products.
    pub fn bucket(&self) -> String {
        format!("noaa-{}", self.name())
    }
}

impl fmt::Display for Satellite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Satellite {
    type Err = GoesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "goes16" | "g16" => Ok(Satellite::Goes16),
            "goes17" | "g17" => Ok(Satellite::Goes17),
            "goes18" | "g18" => Ok(Satellite::Goes18),
            "goes19" | "g19" => Ok(Satellite::Goes19),
            other => Err(GoesError::InvalidFormat(format!("unknown satellite '{}'", other))),
        }
    }
}

/// ABI L1b radiance product (scan sector).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Product {
    /// Full disk
    #[default]
    RadF,
    /// CONUS / PACUS
    RadC,
    /// Mesoscale sector 1
    RadM1,
    /// Mesoscale sector 2
    RadM2,
}

impl Product {
    /// Directory name of the product inside the bucket.
    pub fn directory(&self) -> &'static str {
        match self {
            Product::RadF => "ABI-L1b-RadF",
            Product::RadC => "ABI-L1b-RadC",
            // Both mesoscale sectors share one directory
            Product::RadM1 | Product::RadM2 => "ABI-L1b-RadM",
        }
    }

    /// Product token at the start of file names ("ABI-L1b-RadM1").
    pub fn file_token(&self) -> &'static str {
        match self {
            Product::RadF => "ABI-L1b-RadF",
            Product::RadC => "ABI-L1b-RadC",
            Product::RadM1 => "ABI-L1b-RadM1",
            Product::RadM2 => "ABI-L1b-RadM2",
        }
    }
}

impl FromStr for Product {
    type Err = GoesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches("ABI-L1b-") {
            "RadF" | "F" | "full" => Ok(Product::RadF),
            "RadC" | "C" | "conus" => Ok(Product::RadC),
            "RadM1" | "M1" => Ok(Product::RadM1),
            "RadM2" | "M2" => Ok(Product::RadM2),
            other => Err(GoesError::InvalidFormat(format!("unknown product '{}'", other))),
        }
    }
}

/// One band of one scan: satellite, product, band and observation slot.
///
/// `ten_minute_index` selects the n-th matching file within the hour
/// (0 = top of the hour for full-disk mode 6 scans).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub satellite: Satellite,
    #[serde(default)]
    pub product: Product,
    pub band: u8,
    pub date: NaiveDate,
    pub hour: u32,
    #[serde(default)]
    pub ten_minute_index: usize,
}

impl ScanRequest {
    /// Build a request, validating the band, calendar date and hour.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        satellite: Satellite,
        product: Product,
        band: u8,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        ten_minute_index: usize,
    ) -> GoesResult<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            GoesError::InvalidFormat(format!("invalid date {}-{:02}-{:02}", year, month, day))
        })?;
        let request = Self {
            satellite,
            product,
            band,
            date,
            hour,
            ten_minute_index,
        };
        request.validate()?;
        Ok(request)
    }

    /// Check band and hour ranges (deserialized requests skip `new`).
    pub fn validate(&self) -> GoesResult<()> {
        if !(1..=16).contains(&self.band) {
            return Err(GoesError::InvalidFormat(format!(
                "ABI band must be 1-16, got {}",
                self.band
            )));
        }
        if self.hour > 23 {
            return Err(GoesError::InvalidFormat(format!(
                "hour must be 0-23, got {}",
                self.hour
            )));
        }
        Ok(())
    }

    /// Day of year, 1-based.
    pub fn day_of_year(&self) -> u32 {
        self.date.ordinal()
    }

    /// Key prefix of the hour directory: "ABI-L1b-RadF/2025/071/06/".
    pub fn s3_prefix(&self) -> String {
        format!(
            "{}/{}/{:03}/{:02}/",
            self.product.directory(),
            self.date.year(),
            self.day_of_year(),
            self.hour
        )
    }

    /// Whether an object file name belongs to this product and band,
    /// e.g. `OR_ABI-L1b-RadF-M6C13_G19_s2025071...nc`.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let prefix = format!("OR_{}-M", self.product.file_token());
        let channel = format!("C{:02}_", self.band);
        match file_name.strip_prefix(&prefix) {
            // Scan mode digit(s) come right before the channel token
            Some(rest) => rest
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .starts_with(&channel),
            None => false,
        }
    }

    /// Compact observation label, "20250312_0640".
    pub fn time_label(&self) -> String {
        format!(
            "{}_{:02}{}0",
            self.date.format("%Y%m%d"),
            self.hour,
            self.ten_minute_index
        )
    }
}

impl fmt::Display for ScanRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} C{:02} {} {:02}Z #{}",
            self.satellite,
            self.product.file_token(),
            self.band,
            self.date,
            self.hour,
            self.ten_minute_index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(band: u8) -> ScanRequest {
        ScanRequest::new(Satellite::Goes19, Product::RadF, band, 2025, 3, 12, 6, 4).unwrap()
    }

    #[test]
    fn test_prefix_uses_day_of_year() {
        let req = request(13);
        assert_eq!(req.day_of_year(), 71);
        assert_eq!(req.s3_prefix(), "ABI-L1b-RadF/2025/071/06/");
        assert_eq!(req.satellite.bucket(), "noaa-goes19");
    }

    #[test]
    fn test_matches_file_name() {
        let req = request(7);
        assert!(req.matches_file_name(
            "OR_ABI-L1b-RadF-M6C07_G19_s20250710640208_e20250710649528_c20250710649570.nc"
        ));
        assert!(!req.matches_file_name(
            "OR_ABI-L1b-RadF-M6C17_G19_s20250710640208_e20250710649528_c20250710649570.nc"
        ));
        assert!(!req.matches_file_name(
            "OR_ABI-L1b-RadC-M6C07_G19_s20250710641173_e20250710643546_c20250710643587.nc"
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(ScanRequest::new(Satellite::Goes16, Product::RadF, 0, 2025, 3, 12, 6, 0).is_err());
        assert!(ScanRequest::new(Satellite::Goes16, Product::RadF, 13, 2025, 2, 30, 6, 0).is_err());
        assert!(ScanRequest::new(Satellite::Goes16, Product::RadF, 13, 2025, 2, 3, 24, 0).is_err());
    }

    #[test]
    fn test_satellite_parse() {
        assert_eq!("goes19".parse::<Satellite>().unwrap(), Satellite::Goes19);
        assert_eq!("GOES-16".parse::<Satellite>().unwrap(), Satellite::Goes16);
        assert!("meteosat".parse::<Satellite>().is_err());
    }
}
