pub mod error;
pub mod problem;
pub mod builder;
pub mod simplex;
pub mod interior;
pub mod linprog;
pub mod mip;
pub mod model;
pub mod tutorial;

mod bench_util;

mod random_tests;
