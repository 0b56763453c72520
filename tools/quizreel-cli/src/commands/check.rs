//! Check external tool availability.

use quizreel_render_engine::command_exists;

pub fn run() -> anyhow::Result<()> {
    println!("QuizReel System Check");
    println!("{}", "=".repeat(50));

    let tools = [
        ("ffprobe", "audio durations; without it soundtracks and tick sounds are skipped"),
        ("ffmpeg", "renders the exported timeline manifest"),
    ];

    let mut all_ok = true;
    for (binary, purpose) in tools {
        if command_exists(binary) {
            println!("[OK]   {binary}");
        } else {
            all_ok = false;
            println!("[WARN] {binary} not found in PATH ({purpose})");
        }
    }

    println!();
    if all_ok {
        println!("All external tools are available. QuizReel is ready.");
    } else {
        println!("Some tools are missing. Timelines still build; see above.");
    }

    Ok(())
}
