//! The `gavel init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("submissions.json").exists() {
        println!("submissions.json already exists, skipping.");
    } else {
        std::fs::write("submissions.json", SAMPLE_SUBMISSIONS)?;
        println!("Created submissions.json");
    }

    if std::path::Path::new("judges.json").exists() {
        println!("judges.json already exists, skipping.");
    } else {
        std::fs::write("judges.json", SAMPLE_JUDGES)?;
        println!("Created judges.json");
    }

    println!("\nNext steps:");
    println!("  1. Replace the sample records with your own data");
    println!("  2. Run: gavel pairs");
    println!("  3. Run: gavel run --endpoint https://your-judging-service (or --offline)");
    println!("  4. Run: gavel summary");

    Ok(())
}

const SAMPLE_SUBMISSIONS: &str = r#"[
  {
    "id": "sub-001",
    "content": {
      "text": "The mitochondria is the powerhouse of the cell."
    },
    "metadata": {
      "source": "sample"
    },
    "created_at": "2026-01-01T00:00:00Z"
  },
  {
    "id": "sub-002",
    "content": {
      "text": "Water boils at 50 degrees Celsius at sea level."
    },
    "metadata": {
      "source": "sample"
    },
    "created_at": "2026-01-01T00:05:00Z"
  }
]
"#;

const SAMPLE_JUDGES: &str = r#"[
  {
    "id": "judge-accuracy",
    "name": "Factual Accuracy",
    "criteria": "Pass if every factual claim in the submission is correct.",
    "active": true
  },
  {
    "id": "judge-clarity",
    "name": "Clarity",
    "criteria": "Pass if the submission is clearly worded and unambiguous.",
    "active": true
  },
  {
    "id": "judge-tone",
    "name": "Tone",
    "criteria": "Pass if the tone is neutral and professional.",
    "active": false
  }
]
"#;
