mod common;
mod comparison;
mod projection;
mod scope;
