#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), no_main)]
#![allow(async_fn_in_trait)]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

// This must go FIRST so that all the other modules see its macros.
mod fmt;

use device::Device;
use status::Status;

pub mod config;
pub mod device;
pub mod irq;
pub mod receiver;
pub mod status;

/// Errors that end the receive duty cycle. Only initialization produces them.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Error<D>
where
    D: Device,
{
    Device(device::Error<D>),
    Configuration(Status),
}
