use crate::constants::DELIMITER;
use serde::{Deserialize, Serialize};

/// Address sent to the lookup service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressQuery {
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip5: String,
}

impl AddressQuery {
    /// Builds a query from the four consecutive fields starting at `start_column`
    /// (street, city, state, zip). Fields past the end of the record are empty.
    pub fn from_record(fields: &[&str], start_column: usize) -> Self {
        Self {
            address1: field_at(fields, start_column).to_string(),
            address2: String::new(),
            city: field_at(fields, start_column + 1).to_string(),
            state: field_at(fields, start_column + 2).to_string(),
            zip5: field_at(fields, start_column + 3).to_string(),
        }
    }

    /// Form parameters in the order the lookup endpoint expects them
    pub fn form_params(&self) -> [(&'static str, &str); 5] {
        [
            ("address1", self.address1.as_str()),
            ("address2", self.address2.as_str()),
            ("city", self.city.as_str()),
            ("state", self.state.as_str()),
            ("zip", self.zip5.as_str()),
        ]
    }
}

/// One candidate address from a zip-by-address lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressResponse {
    pub address_line1: String,
    pub carrier_route: String,
    pub check_digit: String,
    pub city: String,
    #[serde(rename = "cmar")]
    pub is_cmar: String,
    pub county_name: String,
    pub default_flag: String,
    pub default_ind: String,
    pub delivery_point: String,
    pub dpv_confirmation: String,
    pub elot: String,
    pub elot_indicator: String,
    pub record_type: String,
    pub state: String,
    pub zip4: String,
    pub zip5: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZipByAddressResponse {
    pub address_list: Vec<AddressResponse>,
    pub result_status: String,
}

impl ZipByAddressResponse {
    /// First candidate, or an empty address when the service returned none
    pub fn first_address(&self) -> AddressResponse {
        self.address_list.first().cloned().unwrap_or_default()
    }
}

/// Splits an input line into its raw fields
pub fn split_record(line: &str) -> Vec<&str> {
    line.split(DELIMITER).collect()
}

fn field_at<'a>(fields: &[&'a str], index: usize) -> &'a str {
    fields.get(index).copied().unwrap_or("")
}

/// Appends the normalized street line to the original input line
pub fn output_record(line: &str, address_line1: &str) -> String {
    let mut out = String::with_capacity(line.len() + address_line1.len() + 1);
    out.push_str(line);
    out.push(DELIMITER);
    out.push_str(address_line1);
    out
}
