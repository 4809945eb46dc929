//! Road network checks for roadcheck.
//!
//! [`short_segment::ShortSegmentRule`] flags short, poorly connected edges. It is
//! composed from three read-only analyses ([`valence`], [`gate`], [`boundary`]) and
//! driven by the generic [`runner`] through the [`check::Check`] trait.

pub mod boundary;
pub mod check;
pub mod flag;
pub mod gate;
pub mod runner;
pub mod short_segment;
pub mod valence;
