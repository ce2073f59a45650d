//! Unit tests for annotation format implementations.
//!
//! These tests exercise the formats against real files in temporary
//! directories: merging, replacement, decoding failures and round trips.

mod coco_keypoints_tests;
