#[allow(non_snake_case)]
pub mod Abstraction;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod IR;
#[allow(non_snake_case)]
pub mod KineticLaw;
pub mod error;
