pub mod form;
pub mod mailer;
pub mod relay;

pub use form::{ContactForm, ContactInquiry, BUDGET_RANGES, COUNTRY_CODES, INQUIRY_PROPERTY_TYPES};
pub use mailer::{LogMailer, Mailer, OutgoingEmail, ResendMailer};
pub use relay::{EmailRelay, FunctionClient, InquiryRelay, RelayIdentity};
