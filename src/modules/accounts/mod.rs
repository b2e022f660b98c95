pub mod controller;
pub mod identifier;
pub mod model;
pub mod router;
pub mod service;
