pub mod address;
pub mod person;
pub mod region;

pub use address::Address;
pub use person::Person;
pub use region::Region;
