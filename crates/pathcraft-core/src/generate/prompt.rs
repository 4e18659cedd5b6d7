//! Prompt construction for plan generation.
//!
//! The system prompt fixes the designer role, the pedagogical principles,
//! and one worked example of the output schema. The user prompt carries
//! the per-request parameters plus the source-whitelisting rules that keep
//! generated URLs on stable, free, embeddable domains.

use super::GenerateRequest;

/// Role, pedagogy, and a worked example of the exact output schema.
const SYSTEM_PROMPT: &str = r#"You are an expert learning path designer with expertise in creating comprehensive, realistic study plans using REAL resources that actually exist online.

LEARNING DESIGN PRINCIPLES:
- Progressive complexity: Start with fundamentals, build to advanced concepts
- Spaced repetition: Revisit key concepts across multiple weeks
- Multi-modal learning: Mix videos, reading, interactive exercises, and projects
- Practical application: Include hands-on projects to reinforce learning
- Resource diversity: Use different teaching styles and perspectives

EXAMPLE - Python for Beginners (2 weeks, 5 hours/week):
{
  "topic": "Python Programming",
  "weeks": [
    {
      "weekNumber": 1,
      "theme": "Python Fundamentals & Syntax",
      "resources": [
        {
          "id": 1,
          "type": "video",
          "title": "Python Tutorial for Beginners - Full Course",
          "source": "YouTube - freeCodeCamp.org",
          "url": "https://www.youtube.com/watch?v=rfscVS0vtbw",
          "duration": "3 hours (watch sections 1-3)",
          "description": "Comprehensive introduction to Python basics, variables, and data types",
          "completed": false
        },
        {
          "id": 2,
          "type": "reading",
          "title": "Python Official Tutorial",
          "source": "Python.org Documentation",
          "url": "https://docs.python.org/3/tutorial/",
          "duration": "1.5 hours",
          "description": "Official Python documentation covering basic syntax and data structures",
          "completed": false
        },
        {
          "id": 3,
          "type": "interactive",
          "title": "Learn Python Basics",
          "source": "freeCodeCamp",
          "url": "https://www.freecodecamp.org/learn/scientific-computing-with-python/",
          "duration": "2 hours",
          "description": "Interactive exercises for Python fundamentals",
          "completed": false
        }
      ]
    },
    {
      "weekNumber": 2,
      "theme": "Control Flow & Functions",
      "resources": [
        {
          "id": 4,
          "type": "video",
          "title": "Python Functions Tutorial",
          "source": "YouTube - Corey Schafer",
          "url": "https://www.youtube.com/watch?v=9Os0o3wzS_I",
          "duration": "30 minutes",
          "description": "Deep dive into Python functions and scope",
          "completed": false
        },
        {
          "id": 5,
          "type": "reading",
          "title": "Python Control Flow",
          "source": "Real Python",
          "url": "https://realpython.com/python-conditional-statements/",
          "duration": "1 hour",
          "description": "Understanding if statements, loops, and logic",
          "completed": false
        },
        {
          "id": 6,
          "type": "project",
          "title": "Build a Simple Calculator",
          "source": "GitHub - Practice Project",
          "url": "https://github.com/topics/python-calculator",
          "duration": "3 hours",
          "description": "Apply functions and control flow to build a working calculator",
          "completed": false
        }
      ]
    }
  ]
}"#;

/// Source-whitelisting rules shared by every request.
const URL_RULES: &str = r#"- CRITICAL URL REQUIREMENTS:
  * YouTube: ONLY use videos from major educational channels (freeCodeCamp.org, Traversy Media, Programming with Mosh, Corey Schafer, etc.)
  * Documentation: Only official documentation sites (docs.python.org, developer.mozilla.org, reactjs.org, etc.)
  * Courses: Only official course platform pages (coursera.org, edx.org, khanacademy.org, freecodecamp.org)
  * Articles: Only major tech publications (dev.to, css-tricks.com, smashingmagazine.com, realpython.com)
  * Interactive: Prefer embeddable platforms (CodePen, CodeSandbox, StackBlitz, Replit, freeCodeCamp)
- ABSOLUTELY AVOID:
  * Udemy links (often removed or made private)
  * Old blog posts or personal websites
  * Any URL you are not 100% certain is currently active
  * Paywalled or premium content
  * Sites that block iframe embedding (Facebook, Twitter, LinkedIn)
- EMBEDDABLE CONTENT PRIORITY:
  * Prioritize resources that can be embedded directly in the learning interface
  * YouTube videos, freeCodeCamp interactive exercises, CodePen demos, PDF documents"#;

/// Build the static system instruction block.
pub fn build_system_prompt() -> String {
    SYSTEM_PROMPT.to_string()
}

/// Build the per-request user prompt.
///
/// `resource_count` is the derived target (see
/// [`super::resource_count`]), not the raw weeks * hours product.
pub fn build_user_prompt(request: &GenerateRequest, resource_count: u32) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str(&format!(
        "Create a {}-week study plan for learning \"{}\" at {} level, with {} hours per week.\n\n",
        request.weeks, request.topic, request.level, request.hours_per_week
    ));

    prompt.push_str("Requirements:\n");
    prompt.push_str(&format!(
        "- Include {resource_count} REAL, CURRENTLY ACTIVE resources that are verified to exist\n"
    ));
    prompt.push_str(URL_RULES);
    prompt.push('\n');
    prompt.push_str(
        "- Organize by week with clear, progressive themes\n\
         - Each resource needs: title, source, URL, estimated time, description\n\
         - Mix content types: videos, reading, interactive, projects\n\
         - Only include resources that are FREE and permanently accessible\n\
         - Follow the example above for structure and quality\n\
         - Ensure logical skill progression across weeks\n\n",
    );

    prompt.push_str(&format!(
        r#"Return ONLY valid JSON in this exact format (no markdown, no code blocks):
{{
  "topic": "{}",
  "weeks": [
    {{
      "weekNumber": 1,
      "theme": "Week theme here",
      "resources": [
        {{
          "id": 1,
          "type": "video",
          "title": "Exact title of real resource",
          "source": "Platform - Creator/Channel",
          "url": "https://actual-working-url.com",
          "duration": "X hours",
          "description": "Brief description of what this teaches",
          "completed": false
        }}
      ]
    }}
  ]
}}"#,
        request.topic
    ));

    prompt
}
