//! Human-readable labels for walker paths
//!
//! `/movies/POST/requestBody/application/json.avg_rating` reads as
//! `avg_rating (POST - /movies - Request Body)`.

use slsbench_spec::{Method, COMPONENT_SCHEMA_PREFIX};

const LOCATION_KEYWORDS: [&str; 3] = ["requestBody", "response", "parameter"];

/// Prompt label asking for the hint of the field at `path`
#[must_use]
pub fn hint_prompt(path: &str) -> String {
    format!("Select hint for {}", readable_path(path))
}

/// Render a walker path for display
#[must_use]
pub fn readable_path(path: &str) -> String {
    if let Some(rest) = path.strip_prefix(COMPONENT_SCHEMA_PREFIX) {
        return match rest.split_once('.') {
            Some((component, field)) => format!("{field} (Component {component})"),
            None => format!("Component {rest}"),
        };
    }

    let (mut field, base) = match path.rfind('.') {
        Some(dot) => (path[dot + 1..].to_string(), &path[..dot]),
        None => {
            let last = path.rsplit('/').next().unwrap_or_default();
            let field = if LOCATION_KEYWORDS.contains(&last) {
                String::new()
            } else {
                last.to_string()
            };
            (field, path)
        }
    };

    let parts: Vec<&str> = base.split('/').filter(|p| !p.is_empty()).collect();
    if parts.is_empty() {
        return if field.is_empty() {
            clean_path(path)
        } else {
            field
        };
    }

    let method_at = parts
        .iter()
        .position(|p| p.parse::<Method>().is_ok() && *p == p.to_uppercase());
    let location_at = match method_at {
        Some(i) => Some(i + 1),
        None => parts.iter().position(|p| LOCATION_KEYWORDS.contains(p)),
    };
    let endpoint_end = method_at.or(location_at).unwrap_or(0);

    let mut context = Vec::with_capacity(3);
    if let Some(i) = method_at {
        context.push(parts[i].to_string());
    }
    if endpoint_end > 0 {
        context.push(format!("/{}", parts[..endpoint_end].join("/")));
    }
    if let Some(i) = location_at {
        match parts.get(i).copied() {
            Some("requestBody") => context.push("Request Body".to_string()),
            Some("response") => match parts.get(i + 1) {
                Some(code) => context.push(format!("Response {code}")),
                None => context.push("Response".to_string()),
            },
            Some("parameter") => {
                context.push("Parameter".to_string());
                if field.is_empty() {
                    if let Some(name) = parts.get(i + 1) {
                        field = (*name).to_string();
                    }
                }
            }
            _ => {}
        }
    }

    // A bare endpoint prefix is not useful context on its own.
    if method_at.is_none() && location_at.is_none() {
        context.clear();
    }

    match (field.is_empty(), context.is_empty()) {
        (true, true) => clean_path(path),
        (false, true) => field,
        (true, false) => context.join(" - "),
        (false, false) => format!("{field} ({})", context.join(" - ")),
    }
}

fn clean_path(path: &str) -> String {
    path.replace('/', " → ").replace('.', " > ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_property() {
        assert_eq!(
            readable_path("/movies/POST/requestBody/application/json.avg_rating"),
            "avg_rating (POST - /movies - Request Body)"
        );
    }

    #[test]
    fn response_property_keeps_status() {
        assert_eq!(
            readable_path("/api/users/GET/response/200/application/json.email"),
            "email (GET - /api/users - Response 200)"
        );
    }

    #[test]
    fn nested_array_item_uses_last_segment() {
        assert_eq!(
            readable_path("/items/GET/response/200/application/json[].tags[].name"),
            "name (GET - /items - Response 200)"
        );
    }

    #[test]
    fn operation_parameter() {
        assert_eq!(
            readable_path("/movies/{id}/DELETE/parameter/id"),
            "id (DELETE - /movies/{id} - Parameter)"
        );
    }

    #[test]
    fn path_level_parameter() {
        assert_eq!(
            readable_path("/movies/{id}/parameter/id"),
            "id (/movies/{id} - Parameter)"
        );
    }

    #[test]
    fn component_property() {
        assert_eq!(
            readable_path("#/components/schemas/Movie.title"),
            "title (Component Movie)"
        );
    }

    #[test]
    fn lowercase_method_like_segment_is_not_a_method() {
        assert_eq!(readable_path("/budget/get.total"), "total");
    }

    #[test]
    fn location_without_field() {
        assert_eq!(readable_path("/requestBody"), "Request Body");
    }

    #[test]
    fn unstructured_path_falls_back_to_arrows() {
        assert_eq!(readable_path("/a/b/"), " → a → b → ");
    }

    #[test]
    fn prompt_label() {
        assert_eq!(
            hint_prompt("/a/GET/parameter/q"),
            "Select hint for q (GET - /a - Parameter)"
        );
    }
}
