//! Constants used throughout the Openspace core crate.
//!
//! This module holds the literal defaults of the chart page so that the missing-data policy
//! lives in one place.

/// Application name appended to page titles.
pub const DEFAULT_APP_NAME: &str = "Openspace EHR";

/// Default base URL of the patient data API.
pub const DEFAULT_PATIENT_API_URL: &str = "http://localhost:5000/api";

/// Default timeout for a single patient API call, in seconds.
pub const DEFAULT_PATIENT_API_TIMEOUT_SECS: u64 = 30;

/// Default redirect target when a chart request carries no usable patient id.
pub const DEFAULT_PATIENT_LIST_PATH: &str = "/patients";

/// Default idle lifetime of a user session, in minutes.
pub const DEFAULT_SESSION_IDLE_MINUTES: i64 = 24;

/// Tab shown when the request names none.
pub const DEFAULT_TAB: &str = "summary";

/// Placeholder text for missing identity fields.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder text for missing insurance fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// Prefix of synthesised medical record numbers.
pub const MRN_PREFIX: &str = "MRN";

/// Width the patient id is zero-padded to inside a synthesised MRN.
pub const MRN_PAD_WIDTH: usize = 6;

/// Date of birth used for age calculation when the record has none.
pub const FALLBACK_AGE_DOB: &str = "1955-01-01";

/// Display format for dates of birth and encounter dates.
pub const DISPLAY_DATE_FORMAT: &str = "%m/%d/%Y";

/// Display format for sticky note timestamps.
pub const DISPLAY_DATETIME_FORMAT: &str = "%m/%d/%Y %H:%M";

/// Masked SSN prefix; only the last four digits are ever shown.
pub const SSN_MASK_PREFIX: &str = "xxx-xx-";

/// Shown in place of missing SSN digits.
pub const SSN_MISSING_DIGITS: &str = "****";

/// Default room when the record has none.
pub const DEFAULT_ROOM: &str = "412-A";

/// Default attending physician when the record has none.
pub const DEFAULT_ATTENDING: &str = "Dr. Sarah Wilson";

/// Number of allergies listed on the banner badge before collapsing to `+N`.
pub const BANNER_ALLERGY_LIMIT: usize = 2;

/// Name of the session cookie issued by the REST layer.
pub const SESSION_COOKIE_NAME: &str = "openspace_session";
