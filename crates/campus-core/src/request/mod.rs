//! Generic service request domain module.

mod model;

pub use model::{
    NewServiceRequest, Priority, REQUEST_TYPES, RequestPage, RequestQuery, RequestStatus,
    ServiceRequest,
};
