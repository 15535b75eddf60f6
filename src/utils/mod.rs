pub mod invite_code;
pub mod responses;
