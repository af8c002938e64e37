pub mod department;
pub mod leave_approval;
pub mod leave_request;
pub mod user;
