// tonal-gen -- music theory engine and chord progression generator
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

pub mod chord;
pub mod duration;
pub mod generator;
pub mod notation;
pub mod note;
pub mod pitch;
pub mod song;
pub mod tonality;

// Utility modules
pub mod rational;
