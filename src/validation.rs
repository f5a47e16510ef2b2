//! Validation module for user-entered food data
//!
//! Checks run before any storage mutation reaches the network, so a rejected
//! input never changes local or remote state.

/// Longest accepted food name, in characters
pub const MAX_FOOD_NAME_LEN: usize = 100;

/// Validates a food name input
///
/// # Arguments
/// * `name` - The food name to validate
///
/// # Returns
/// * `Ok(&str)` - The trimmed name if valid
/// * `Err(&str)` - Error type: "empty" or "too_long"
///
/// # Examples
/// ```
/// use intelli_foods::validation::validate_food_name;
///
/// assert_eq!(validate_food_name("  Eggs "), Ok("Eggs"));
/// assert_eq!(validate_food_name("   "), Err("empty"));
/// assert_eq!(validate_food_name(&"a".repeat(101)), Err("too_long"));
/// ```
pub fn validate_food_name(name: &str) -> Result<&str, &'static str> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    if trimmed.chars().count() > MAX_FOOD_NAME_LEN {
        return Err("too_long");
    }

    Ok(trimmed)
}

/// Human-readable message for a validation error code
pub fn validation_message(code: &str) -> &'static str {
    match code {
        "empty" => "Please fill in the food name",
        "too_long" => "Food name is too long",
        _ => "Invalid input",
    }
}
