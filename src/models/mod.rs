pub mod quarter;
pub mod resource;
pub mod summary;
pub mod trial;
pub mod validator;
