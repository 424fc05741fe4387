//! ah-psychro: moist-air property solver for air-handling design.
//!
//! Provides:
//! - `PsychrometricConstants`: caller-supplied physical constants and tolerances
//! - `PropertyCalculator`: saturation pressure, humidity, enthalpy, dew point,
//!   specific volume and the iterative wet-bulb inversions
//! - `StatePoint` / `StateInput`: an air condition defined by one of four input pairs
//! - `StatePointResolver`: completes a state point from its input pair
//!
//! # Example
//!
//! ```
//! use ah_psychro::{
//!     PropertyCalculator, PsychrometricConstants, ResolveOptions, StateInput,
//!     StatePointResolver,
//! };
//!
//! let constants = PsychrometricConstants::standard();
//! let calc = PropertyCalculator::new(&constants, 101.325).unwrap();
//! let resolver = StatePointResolver::new(calc);
//!
//! let input = StateInput::DryBulbRh { dry_bulb: 26.0, relative_humidity: 50.0 };
//! let resolved = resolver.resolve_input("room", input, ResolveOptions::default()).unwrap();
//! let w = resolved.point.properties.humidity.unwrap();
//! assert!((w - 0.0105).abs() < 1e-4);
//! ```

pub mod calculator;
pub mod constants;
pub mod error;
pub mod resolver;
pub mod solve;
pub mod state;

// Re-exports for ergonomics
pub use calculator::PropertyCalculator;
pub use constants::{PsychrometricConstants, TetensCoefficients};
pub use error::{PsychroError, PsychroResult};
pub use resolver::{CONSISTENCY_SCALE, Diagnostic, Resolution, ResolveOptions, StatePointResolver};
pub use solve::{NewtonConfig, NewtonResult, newton_solve_1d};
pub use state::{Properties, Property, Season, StateInput, StatePoint};
