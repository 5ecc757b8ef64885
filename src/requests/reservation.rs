use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::config::SessionConfig;
use crate::normalize::CanonicalRecord;
use crate::request::{require, to_xml, OtaRequest, RequestError};

const METHOD: &str = "OTA_HotelResRQ";

/// Proof of a quoted price, returned by an availability call.
///
/// The keys and values are opaque to the client: they are read from the
/// `TPA_Extensions/ConfirmData` element of the availability response and sent
/// back unchanged as attributes of the reservation's `ConfirmData` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmToken(BTreeMap<String, String>);

impl ConfirmToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    // Pull the token out of a processed availability response
    pub fn from_record(record: &CanonicalRecord) -> Option<Self> {
        let confirm_data = record.path(&["TPA_Extensions", "ConfirmData"])?;
        let fields = confirm_data.as_record()?;

        let token: BTreeMap<String, String> = fields
            .iter()
            .filter_map(|(key, value)| Some((key.clone(), value.as_text()?.to_string())))
            .collect();

        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ConfirmToken {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    // ISO country code
    pub country_code: String,
    pub gender: Gender,
    pub telephone_number: Option<String>,
    pub estimated_arrival_time: NaiveTime,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCard {
    pub card_number: String,
    // e.g. "VI"
    pub card_type: String,
    // the customer's full name is used when absent
    pub card_holder_name: Option<String>,
    // MMYY, e.g. "0919"
    pub expiry_date: String,
    pub cvv: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReservationRequest {
    pub confirm_token: ConfirmToken,
    pub customer: Customer,
    pub payment_card: PaymentCard,
    pub comment: Option<String>,
}

impl OtaRequest for ReservationRequest {
    fn method_name(&self) -> &'static str {
        METHOD
    }

    fn version(&self) -> &'static str {
        "1.003"
    }

    fn validate(&self) -> Result<(), RequestError> {
        let card = &self.payment_card;
        require(METHOD, "CardNumber", &card.card_number)?;
        require(METHOD, "CardCode", &card.card_type)?;
        require(METHOD, "ExpireDate", &card.expiry_date)?;
        require(METHOD, "SeriesCode", &card.cvv)?;

        let customer = &self.customer;
        require(METHOD, "GivenName", &customer.first_name)?;
        require(METHOD, "Surname", &customer.last_name)?;
        require(METHOD, "Email", &customer.email)?;
        require(METHOD, "CitizenCountryName", &customer.country_code)?;

        if self.confirm_token.is_empty() {
            return Err(RequestError::MissingField {
                operation: METHOD,
                field: "ConfirmData",
            });
        }
        Ok(())
    }

    fn body(&self, _config: &SessionConfig) -> Result<String, RequestError> {
        let card = &self.payment_card;
        let customer = &self.customer;
        let card_holder_name = card
            .card_holder_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| customer.full_name());

        to_xml(&XmlHotelReservations {
            hotel_reservation: XmlHotelReservation {
                room_stays: XmlRoomStays {
                    room_stay: XmlRoomStay {
                        guarantee: XmlGuarantee {
                            guarantees_accepted: XmlGuaranteesAccepted {
                                guarantee_accepted: XmlGuaranteeAccepted {
                                    payment_card: XmlPaymentCard {
                                        card_code: &card.card_type,
                                        card_number: &card.card_number,
                                        expire_date: &card.expiry_date,
                                        series_code: &card.cvv,
                                        card_holder_name,
                                    },
                                },
                            },
                        },
                    },
                },
                res_guests: XmlResGuests {
                    res_guest: XmlResGuest {
                        arrival_time: customer.estimated_arrival_time.format("%H:%M").to_string(),
                        profiles: XmlProfiles {
                            profile_info: XmlProfileInfo {
                                profile: XmlProfile {
                                    customer: XmlCustomer {
                                        gender: customer.gender.as_str(),
                                        person_name: XmlPersonName {
                                            given_name: &customer.first_name,
                                            surname: &customer.last_name,
                                        },
                                        telephone_number: customer
                                            .telephone_number
                                            .as_deref()
                                            .filter(|phone| !phone.is_empty())
                                            .map(|phone_number| XmlTelephoneNumber {
                                                phone_number,
                                            }),
                                        email: &customer.email,
                                        citizen_country_name: XmlCitizenCountryName {
                                            code: &customer.country_code,
                                        },
                                    },
                                },
                            },
                        },
                        comments: self.comment.as_deref().map(|text| XmlComments { text }),
                    },
                },
                tpa_extensions: XmlConfirmExtension {
                    confirm_data: XmlConfirmData(&self.confirm_token),
                },
            },
        })
    }
}

// Structures for XML serialization
#[derive(Debug, Serialize)]
#[serde(rename = "HotelReservations", rename_all = "PascalCase")]
struct XmlHotelReservations<'a> {
    hotel_reservation: XmlHotelReservation<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlHotelReservation<'a> {
    room_stays: XmlRoomStays<'a>,
    res_guests: XmlResGuests<'a>,
    #[serde(rename = "TPA_Extensions")]
    tpa_extensions: XmlConfirmExtension<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlRoomStays<'a> {
    room_stay: XmlRoomStay<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlRoomStay<'a> {
    guarantee: XmlGuarantee<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlGuarantee<'a> {
    guarantees_accepted: XmlGuaranteesAccepted<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlGuaranteesAccepted<'a> {
    guarantee_accepted: XmlGuaranteeAccepted<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlGuaranteeAccepted<'a> {
    payment_card: XmlPaymentCard<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlPaymentCard<'a> {
    #[serde(rename = "@CardCode")]
    card_code: &'a str,
    #[serde(rename = "@CardNumber")]
    card_number: &'a str,
    #[serde(rename = "@ExpireDate")]
    expire_date: &'a str,
    #[serde(rename = "@SeriesCode")]
    series_code: &'a str,
    card_holder_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlResGuests<'a> {
    res_guest: XmlResGuest<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlResGuest<'a> {
    #[serde(rename = "@ArrivalTime")]
    arrival_time: String,
    profiles: XmlProfiles<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comments: Option<XmlComments<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlProfiles<'a> {
    profile_info: XmlProfileInfo<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlProfileInfo<'a> {
    profile: XmlProfile<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlProfile<'a> {
    customer: XmlCustomer<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlCustomer<'a> {
    #[serde(rename = "@Gender")]
    gender: &'static str,
    person_name: XmlPersonName<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    telephone_number: Option<XmlTelephoneNumber<'a>>,
    email: &'a str,
    citizen_country_name: XmlCitizenCountryName<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlPersonName<'a> {
    given_name: &'a str,
    surname: &'a str,
}

#[derive(Debug, Serialize)]
struct XmlTelephoneNumber<'a> {
    #[serde(rename = "@PhoneNumber")]
    phone_number: &'a str,
}

#[derive(Debug, Serialize)]
struct XmlCitizenCountryName<'a> {
    #[serde(rename = "@Code")]
    code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlComments<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct XmlConfirmExtension<'a> {
    confirm_data: XmlConfirmData<'a>,
}

// Token entries become attributes of the element, whatever their names are
#[derive(Debug)]
struct XmlConfirmData<'a>(&'a ConfirmToken);

impl Serialize for XmlConfirmData<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0.iter() {
            map.serialize_entry(&format!("@{}", key), value)?;
        }
        map.end()
    }
}
