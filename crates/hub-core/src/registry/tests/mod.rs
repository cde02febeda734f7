#[cfg(test)]
mod waiter_tests;
