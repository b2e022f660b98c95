pub mod controller;
pub mod dispatch;
pub mod model;
pub mod router;
pub mod service;
