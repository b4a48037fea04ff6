pub mod company;
pub mod job;

pub use company::{Company, CompanyDetail, CompanyJob, NewCompany};
pub use job::{Job, NewJob};
