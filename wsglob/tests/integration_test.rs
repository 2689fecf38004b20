use anyhow::Result;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use wsglob::{
    find_files, resolve_scope, FinderOptions, ScopeResolution, SearchParams, SearchScope,
    WorkspaceFolders,
};

// Helper function to create test files below a root
fn create_test_files(root: &Path, files: &[&str]) -> Result<()> {
    for name in files {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, format!("// {}\n", name))?;
    }
    Ok(())
}

/// Two workspace folders, `web` and `api`, with a handful of files each
fn create_workspace() -> Result<(TempDir, PathBuf, PathBuf)> {
    let dir = tempdir()?;
    let web = dir.path().join("web");
    let api = dir.path().join("api");

    create_test_files(
        &web,
        &[
            "src/index.js",
            "src/components/button.js",
            "src/styles.css",
            "test/index.test.js",
            "node_modules/lodash/index.js",
        ],
    )?;
    create_test_files(
        &api,
        &[
            "src/server.js",
            "src/routes/users.js",
            "test/server.test.js",
            "README.md",
        ],
    )?;
    Ok((dir, web, api))
}

fn relative_files(root: &Path, files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|f| {
            f.strip_prefix(root)
                .unwrap_or(f.as_path())
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

fn options() -> FinderOptions {
    FinderOptions {
        threads: NonZeroUsize::new(2).unwrap(),
        ..FinderOptions::default()
    }
}

#[test]
fn test_general_include_applies_to_every_folder() -> Result<()> {
    let (_dir, web, api) = create_workspace()?;
    let folders = WorkspaceFolders::from_paths(&[&web, &api])?;
    let scope = SearchScope::for_folders(Some("src/**/*.js"), None, &folders);

    let output = find_files(&folders, &scope, &options())?;
    assert_eq!(output.folders.len(), 2);
    assert_eq!(
        relative_files(&web, &output.folders[0].files),
        vec!["src/components/button.js", "src/index.js"]
    );
    assert_eq!(
        relative_files(&api, &output.folders[1].files),
        vec!["src/routes/users.js", "src/server.js"]
    );
    assert_eq!(output.total_files, 4);
    Ok(())
}

#[test]
fn test_folder_relative_include() -> Result<()> {
    let (_dir, web, api) = create_workspace()?;
    let folders = WorkspaceFolders::from_paths(&[&web, &api])?;
    let scope = SearchScope::for_folders(Some("api/test, web/src/styles.css"), None, &folders);

    let output = find_files(&folders, &scope, &options())?;
    assert_eq!(
        relative_files(&web, &output.folders[0].files),
        vec!["src/styles.css"]
    );
    assert_eq!(
        relative_files(&api, &output.folders[1].files),
        vec!["test/server.test.js"]
    );
    Ok(())
}

#[test]
fn test_exclude_removes_files() -> Result<()> {
    let (_dir, web, api) = create_workspace()?;
    let folders = WorkspaceFolders::from_paths(&[&web, &api])?;
    let scope = SearchScope::for_folders(None, Some("node_modules, *.test.js, api/README.md"), &folders);

    let output = find_files(&folders, &scope, &options())?;
    assert_eq!(
        relative_files(&web, &output.folders[0].files),
        vec!["src/components/button.js", "src/index.js", "src/styles.css"]
    );
    assert_eq!(
        relative_files(&api, &output.folders[1].files),
        vec!["src/routes/users.js", "src/server.js"]
    );
    Ok(())
}

#[test]
fn test_absolute_include_passes_through() -> Result<()> {
    let (_dir, web, api) = create_workspace()?;
    let folders = WorkspaceFolders::from_paths(&[&web, &api])?;
    let absolute = format!(
        "{}/src/routes",
        api.to_string_lossy().replace('\\', "/")
    );
    let scope = SearchScope::for_folders(Some(absolute.as_str()), None, &folders);

    let output = find_files(&folders, &scope, &options())?;
    assert!(output.folders[0].files.is_empty());
    assert_eq!(
        relative_files(&api, &output.folders[1].files),
        vec!["src/routes/users.js"]
    );
    Ok(())
}

#[test]
fn test_gitignore_is_honored_unless_disabled() -> Result<()> {
    let (_dir, web, _api) = create_workspace()?;
    fs::write(web.join(".gitignore"), "node_modules/\n")?;
    let folders = WorkspaceFolders::from_paths(&[&web])?;
    let scope = SearchScope::for_folders(Some("**/index.js"), None, &folders);

    let output = find_files(&folders, &scope, &options())?;
    assert_eq!(
        relative_files(&web, &output.folders[0].files),
        vec!["src/index.js"]
    );

    let unfiltered = FinderOptions {
        git_ignore: false,
        ..options()
    };
    let output = find_files(&folders, &scope, &unfiltered)?;
    assert_eq!(
        relative_files(&web, &output.folders[0].files),
        vec!["node_modules/lodash/index.js", "src/index.js"]
    );
    Ok(())
}

#[test]
fn test_resolve_then_find() -> Result<()> {
    let (_dir, web, api) = create_workspace()?;
    let folders = WorkspaceFolders::from_paths(&[&web, &api])?;
    let params = SearchParams {
        find: Some("require($a)".to_string()),
        include: Some("web/src, api/src".to_string()),
        exclude: Some("routes".to_string()),
        ..SearchParams::default()
    };

    let scope = match resolve_scope(&params, &folders) {
        ScopeResolution::Ready(scope) => scope,
        other => panic!("expected a runnable scope, got {:?}", other),
    };
    let output = find_files(&folders, &scope, &options())?;
    let all: Vec<_> = output.files().map(Path::to_path_buf).collect();
    assert_eq!(all.len(), 4);
    assert!(all.iter().all(|f| !f.to_string_lossy().contains("routes")));
    Ok(())
}

#[test]
fn test_workspace_file_end_to_end() -> Result<()> {
    let (dir, web, _api) = create_workspace()?;
    let workspace_file = dir.path().join("team.code-workspace");
    fs::write(
        &workspace_file,
        r#"{
            "folders": [
                { "path": "web" },
                { "path": "api" },
            ],
        }"#,
    )?;

    let folders = WorkspaceFolders::from_workspace_file(&workspace_file)?;
    assert_eq!(folders.len(), 2);

    let scope = SearchScope::for_folders(Some("web/test"), None, &folders);
    let output = find_files(&folders, &scope, &options())?;
    assert_eq!(
        relative_files(&web, &output.folders[0].files),
        vec!["test/index.test.js"]
    );
    assert!(output.folders[1].files.is_empty());
    Ok(())
}

#[test]
fn test_nested_folders_report_each_file_once() -> Result<()> {
    let dir = tempdir()?;
    let repo = dir.path().join("repo");
    let app = repo.join("packages").join("app");
    create_test_files(&repo, &["README.md", "packages/app/main.ts"])?;

    let folders = WorkspaceFolders::from_paths(&[&repo, &app])?;
    let scope = SearchScope::for_folders(None, None, &folders);

    let output = find_files(&folders, &scope, &options())?;
    assert_eq!(relative_files(&repo, &output.folders[0].files), vec!["README.md"]);
    assert_eq!(relative_files(&app, &output.folders[1].files), vec!["main.ts"]);
    assert_eq!(output.total_files, 2);
    assert_eq!(output.files_scanned, 2);
    Ok(())
}
