use serde::{Deserialize, Serialize};

/// A serializable description of a router's rules, in evaluation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingTable {
    /// Rules in priority order
    pub rules: Vec<RuleDescription>,
    /// Label of the route taken when nothing matches
    pub fallback: String,
}

/// A serializable rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDescription {
    /// Position in the evaluation order, starting at 0
    pub priority: usize,
    /// Label of the category this rule selects
    pub route: String,
    /// Case-folded trigger keywords
    pub keywords: Vec<String>,
}

impl RoutingTable {
    /// Create a DOT graph representation for visualization
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph router {\n");
        dot.push_str("    \"query\" [shape=box];\n");

        for rule in &self.rules {
            let label = rule.keywords.join(" | ").replace('"', "\\\"");
            dot.push_str(&format!(
                "    \"query\" -> \"{}\" [label=\"{}: {}\"];\n",
                rule.route, rule.priority, label
            ));
        }

        dot.push_str(&format!(
            "    \"query\" -> \"{}\" [label=\"otherwise\", style=dashed];\n",
            self.fallback
        ));
        dot.push_str("}\n");
        dot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RoutingTable {
        RoutingTable {
            rules: vec![
                RuleDescription {
                    priority: 0,
                    route: "ticketing".to_string(),
                    keywords: vec!["ticket".to_string(), "showtime".to_string()],
                },
                RuleDescription {
                    priority: 1,
                    route: "box office".to_string(),
                    keywords: vec!["budget".to_string()],
                },
            ],
            fallback: "fallback".to_string(),
        }
    }

    #[test]
    fn test_to_dot() {
        let dot = table().to_dot();
        assert!(dot.starts_with("digraph router {\n"));
        assert!(dot.contains("\"query\" -> \"ticketing\" [label=\"0: ticket | showtime\"];"));
        assert!(dot.contains("\"query\" -> \"box office\" [label=\"1: budget\"];"));
        assert!(dot.contains("\"query\" -> \"fallback\" [label=\"otherwise\", style=dashed];"));
        assert!(dot.find("ticketing").unwrap() < dot.find("box office").unwrap());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(table()).unwrap();
        assert_eq!(json["rules"][0]["route"], "ticketing");
        assert_eq!(json["rules"][1]["priority"], 1);
        assert_eq!(json["fallback"], "fallback");
    }
}
