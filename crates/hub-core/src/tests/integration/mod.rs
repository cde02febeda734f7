#![cfg(test)]

mod boot_tests;
