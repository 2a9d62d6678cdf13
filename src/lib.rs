// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
//! Sampling, summarization and CSV export of AHAP-style haptic patterns, alongside waveform
//! analysis of uploaded audio.
pub mod audio;
pub mod config;
pub mod curve;
pub mod export;
pub mod pattern;
pub mod sampler;
pub mod summary;
pub mod util;
pub mod visualizer;

#[cfg(test)]
mod testutil;
