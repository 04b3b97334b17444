pub mod ack;
pub mod record;

pub use ack::{Ack, AckBody, DEFAULT_ACK_MESSAGE, HealthStatus};
pub use record::{
    ApplicationDetails, ContactDetails, FormInput, RecordDetails, RecordKind, SubmissionRecord,
    TargetCollection,
};
