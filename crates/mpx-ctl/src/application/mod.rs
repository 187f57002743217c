//! Application layer use cases for the control tool.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (here: the `mpx_core` registry) and the infrastructure (config files,
//! terminal output).  Use cases in this layer orchestrate domain objects to
//! fulfil one user goal, such as "move this mouse to the second seat and
//! remember that choice".
//!
//! # Sub-modules
//!
//! - **`controller`** – `MpxController`, one method per `mpx-ctl` subcommand.

pub mod controller;
