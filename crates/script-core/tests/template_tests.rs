#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use script_core::template::render;
    use script_core::ScriptRequest;
    use std::path::{Path, PathBuf};

    fn request(body: &str) -> ScriptRequest {
        ScriptRequest {
            script_body: body.to_string(),
            output_dir: PathBuf::from("/tmp/out"),
            log_dir: PathBuf::from("/tmp/logs"),
            extra_env: IndexMap::new(),
            working_dir: None,
            debug_trace: false,
            creates_marker: None,
            removes_marker: None,
            dry_run: false,
            executable: None,
            decrypt: true,
        }
    }

    const LOG: &str = "/tmp/logs/ci_script_000_t.log";

    #[test]
    fn test_minimal_wrapper_layout() {
        let rendered = render(&request("echo hi\n"), Path::new(LOG));
        assert_eq!(
            rendered.as_str(),
            "#!/bin/bash\n\
             set -euo pipefail\n\
             exec > >(tee -i -a '/tmp/logs/ci_script_000_t.log') 2>&1\n\
             echo hi\n"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut req = request("make test");
        req.extra_env.insert("A".into(), "1".into());
        req.working_dir = Some(PathBuf::from("/src"));
        req.debug_trace = true;
        let first = render(&req, Path::new(LOG));
        let second = render(&req, Path::new(LOG));
        assert_eq!(first, second);
    }

    #[test]
    fn test_body_is_verbatim_and_contiguous() {
        let body = "for f in *; do\n  echo \"$f\"  \t\ndone\n\n# trailing comment";
        let rendered = render(&request(body), Path::new(LOG));
        assert!(rendered.as_str().contains(body));
        assert!(rendered.as_str().ends_with("# trailing comment\n"));
    }

    #[test]
    fn test_exports_keep_insertion_order() {
        let mut req = request("env");
        req.extra_env.insert("ZED".into(), "last?".into());
        req.extra_env.insert("ALPHA".into(), "first?".into());
        req.extra_env.insert("MID".into(), "a b".into());
        let rendered = render(&req, Path::new(LOG));
        let text = rendered.as_str();

        let zed = text.find("export ZED=\"last?\"\n").unwrap();
        let alpha = text.find("export ALPHA=\"first?\"\n").unwrap();
        let mid = text.find("export MID=\"a b\"\n").unwrap();
        let body = text.find("env\n").unwrap();
        assert!(zed < alpha && alpha < mid && mid < body);
        assert_eq!(text.matches("export ").count(), 3);
    }

    #[test]
    fn test_export_values_are_not_escaped() {
        let mut req = request("true");
        req.extra_env.insert("Q".into(), "say \"hi\" $HOME".into());
        let rendered = render(&req, Path::new(LOG));
        assert!(rendered
            .as_str()
            .contains("export Q=\"say \"hi\" $HOME\"\n"));
    }

    #[test]
    fn test_trace_only_with_debug() {
        let req = request("true");
        assert!(!render(&req, Path::new(LOG)).as_str().contains("set -x"));

        let mut req = request("true");
        req.debug_trace = true;
        let rendered = render(&req, Path::new(LOG));
        let text = rendered.as_str();
        let strict = text.find("set -euo pipefail").unwrap();
        let trace = text.find("set -x").unwrap();
        let tee = text.find("exec > >(tee").unwrap();
        assert!(strict < trace && trace < tee);
    }

    #[test]
    fn test_pushd_popd_wrap_body() {
        let req = request("ls");
        let rendered = render(&req, Path::new(LOG));
        assert!(!rendered.as_str().contains("pushd"));
        assert!(!rendered.as_str().contains("popd"));

        let mut req = request("ls");
        req.working_dir = Some(PathBuf::from("/home/zuul/src"));
        req.extra_env.insert("FOO".into(), "bar".into());
        let rendered = render(&req, Path::new(LOG));
        let text = rendered.as_str();
        let push = text.find("pushd /home/zuul/src\n").unwrap();
        let export = text.find("export FOO=\"bar\"").unwrap();
        let body = text.find("ls\n").unwrap();
        let pop = text.find("popd\n").unwrap();
        assert!(push < export && export < body && body < pop);
        assert!(text.ends_with("popd\n"));
    }

    #[test]
    fn test_log_path_is_quoted() {
        let rendered = render(&request("true"), Path::new("/tmp/my logs/it's.log"));
        assert!(rendered
            .as_str()
            .contains("exec > >(tee -i -a '/tmp/my logs/it'\\''s.log') 2>&1\n"));
    }
}
