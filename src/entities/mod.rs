//! Resource modules, one per entity exposed over HTTP

pub mod company;
pub mod industry;
pub mod invoice;
