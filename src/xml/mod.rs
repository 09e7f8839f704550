//! Structured document output.
//!
//! Every element of a reflected file serializes itself to an owned
//! [`XmlElement`](document::XmlElement) fragment; the file then imports those
//! fragments into one [`XmlDocument`](document::XmlDocument).

pub mod document;
