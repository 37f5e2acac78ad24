use regex::Regex;

pub type Validator = Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

pub fn required() -> Validator {
    Box::new(|value: &str| {
        if value.trim().is_empty() {
            Err("This field is required".to_string())
        } else {
            Ok(())
        }
    })
}

pub fn min_length(min: usize) -> Validator {
    Box::new(move |value: &str| {
        if value.chars().count() < min {
            Err(format!("Minimum length is {}", min))
        } else {
            Ok(())
        }
    })
}

pub fn max_length(max: usize) -> Validator {
    Box::new(move |value: &str| {
        if value.chars().count() > max {
            Err(format!("Maximum length is {}", max))
        } else {
            Ok(())
        }
    })
}

pub fn regex(pattern: &str) -> Validator {
    let re = Regex::new(pattern).expect("Invalid regex pattern");
    Box::new(move |value: &str| {
        if re.is_match(value) {
            Ok(())
        } else {
            Err(format!("Value must match pattern: {}", re.as_str()))
        }
    })
}

pub fn email() -> Validator {
    let re = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("Invalid regex pattern");
    Box::new(move |value: &str| {
        if re.is_match(value) {
            Ok(())
        } else {
            Err("Enter a valid email address".to_string())
        }
    })
}

/// Ten digit characters after stripping everything that is not a digit.
pub fn phone() -> Validator {
    Box::new(|value: &str| {
        let digits = value.chars().filter(char::is_ascii_digit).count();
        if digits == 10 {
            Ok(())
        } else {
            Err("Phone number must have exactly 10 digits".to_string())
        }
    })
}

/// National id format: 14 alphanumeric characters, leading letter, `M`/`F`
/// in second position, at least one digit somewhere.
pub fn national_id() -> Validator {
    Box::new(|value: &str| {
        let chars: Vec<char> = value.chars().collect();
        if chars.len() != 14 {
            return Err("National ID must be exactly 14 characters".to_string());
        }
        if !chars.iter().all(|c| c.is_ascii_alphanumeric()) {
            return Err("National ID may only contain letters and digits".to_string());
        }
        if !chars[0].is_ascii_alphabetic() {
            return Err("National ID must start with a letter".to_string());
        }
        if !matches!(chars[1], 'M' | 'F') {
            return Err("Second character of the national ID must be M or F".to_string());
        }
        if !chars.iter().any(char::is_ascii_digit) {
            return Err("National ID must contain at least one digit".to_string());
        }
        Ok(())
    })
}

/// Positive amount such as a salary or monthly income.
pub fn amount() -> Validator {
    Box::new(|value: &str| match value.trim().parse::<f64>() {
        Ok(parsed) if parsed >= 0.0 => Ok(()),
        _ => Err("Enter a valid amount".to_string()),
    })
}

pub fn custom<F>(f: F, message: impl Into<String>) -> Validator
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    let msg = message.into();
    Box::new(move |value: &str| if f(value) { Ok(()) } else { Err(msg.clone()) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_accepts_exactly_ten_digits() {
        let validator = phone();
        assert!(validator("0712345678").is_ok());
        assert!(validator("071-234-5678").is_ok());
    }

    #[test]
    fn phone_rejects_nine_and_eleven_digits() {
        let validator = phone();
        assert!(validator("071234567").is_err());
        assert!(validator("07123456789").is_err());
    }

    #[test]
    fn national_id_rejects_wrong_length() {
        let validator = national_id();
        assert!(validator("CM12345678901").is_err());
    }

    #[test]
    fn national_id_checks_gender_position() {
        let validator = national_id();
        assert!(validator("CX12345678901A").is_err());
        assert!(validator("CM12345678901A").is_ok());
    }

    #[test]
    fn national_id_accepts_well_formed_value() {
        let validator = national_id();
        assert!(validator("AM12345678901X").is_ok());
    }

    #[test]
    fn national_id_requires_a_digit() {
        let validator = national_id();
        assert!(validator("AMABCDEFGHIJKL").is_err());
    }

    #[test]
    fn email_matches_standard_shapes() {
        let validator = email();
        assert!(validator("agnes@example.com").is_ok());
        assert!(validator("not-an-email").is_err());
    }

    #[test]
    fn amount_rejects_negative_and_garbage() {
        let validator = amount();
        assert!(validator("125000").is_ok());
        assert!(validator("125000.50").is_ok());
        assert!(validator("-4").is_err());
        assert!(validator("abc").is_err());
    }
}
