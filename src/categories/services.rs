use tracing::info;
use uuid::Uuid;

use super::{
    dto::{CreateCategoryRequest, UpdateCategoryRequest},
    repo_types::{Category, CategoryChanges, NewCategory},
};
use crate::{
    error::{AppError, AppResult, StoreError},
    state::AppState,
    validation::{is_valid, is_valid_name},
};

fn already_exists() -> AppError {
    AppError::conflict("Category Already Exists")
}

fn checked_name(name: &str) -> AppResult<String> {
    if !is_valid_name(name) {
        return Err(AppError::validation("Invalid Category"));
    }
    Ok(name.trim().to_string())
}

pub async fn create_category(st: &AppState, req: CreateCategoryRequest) -> AppResult<Category> {
    let name = req
        .name
        .filter(|n| is_valid(Some(n)))
        .ok_or_else(|| AppError::validation("Category Name is Required"))?;
    let name = checked_name(&name)?;

    if st.categories.find_by_name(&name).await?.is_some() {
        return Err(already_exists());
    }

    let category = match st
        .categories
        .create(NewCategory {
            name,
            description: req.description,
        })
        .await
    {
        Ok(c) => c,
        Err(StoreError::Duplicate) => return Err(already_exists()),
        Err(e) => return Err(e.into()),
    };
    info!(category_id = %category.id, name = %category.name, "category created");
    Ok(category)
}

pub async fn update_category(st: &AppState, id: Uuid, req: UpdateCategoryRequest) -> AppResult<Category> {
    let mut changes = CategoryChanges::default();

    if let Some(name) = req.name.filter(|n| is_valid(Some(n))) {
        let name = checked_name(&name)?;
        if let Some(existing) = st.categories.find_by_name(&name).await? {
            if existing.id != id {
                return Err(already_exists());
            }
        }
        changes.name = Some(name);
    }

    if let Some(description) = req.description.filter(|d| is_valid(Some(d))) {
        changes.description = Some(description);
    }

    let category = match st.categories.update(id, changes).await {
        Ok(Some(c)) => c,
        Ok(None) => return Err(AppError::not_found("Category Not Found")),
        Err(StoreError::Duplicate) => return Err(already_exists()),
        Err(e) => return Err(e.into()),
    };
    info!(category_id = %id, "category updated");
    Ok(category)
}

pub async fn delete_category(st: &AppState, id: Uuid) -> AppResult<()> {
    if !st.categories.delete(id).await? {
        return Err(AppError::not_found("Category Not Found"));
    }
    info!(category_id = %id, "category deleted");
    Ok(())
}

pub async fn list_categories(st: &AppState) -> AppResult<Vec<Category>> {
    let categories = st.categories.list().await?;
    if categories.is_empty() {
        return Err(AppError::not_found("No categories Found"));
    }
    Ok(categories)
}

pub async fn get_category(st: &AppState, id: Uuid) -> AppResult<Category> {
    st.categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Category Not Found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req(name: &str) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: Some(name.into()),
            description: Some("Everything about pipes".into()),
        }
    }

    #[tokio::test]
    async fn create_and_fetch() {
        let st = AppState::fake();
        let created = create_category(&st, create_req("Plumbing")).await.unwrap();
        let fetched = get_category(&st, created.id).await.unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched.description.as_deref(), Some("Everything about pipes"));
    }

    #[tokio::test]
    async fn duplicate_name_conflicts_case_sensitively() {
        let st = AppState::fake();
        create_category(&st, create_req("Plumbing")).await.unwrap();

        let err = create_category(&st, create_req("Plumbing")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        assert!(create_category(&st, create_req("plumbing")).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_missing_or_malformed_name() {
        let st = AppState::fake();
        let err = create_category(
            &st,
            CreateCategoryRequest {
                name: Some("   ".into()),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Category Name is Required"));

        let err = create_category(&st, create_req("Plumbing 101!")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid Category"));
    }

    #[tokio::test]
    async fn update_applies_only_supplied_fields() {
        let st = AppState::fake();
        let created = create_category(&st, create_req("Plumbing")).await.unwrap();

        let updated = update_category(
            &st,
            created.id,
            UpdateCategoryRequest {
                name: None,
                description: Some("Pipes and drains".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Plumbing");
        assert_eq!(updated.description.as_deref(), Some("Pipes and drains"));

        // keeping its own name is not a conflict
        let same = update_category(
            &st,
            created.id,
            UpdateCategoryRequest {
                name: Some("Plumbing".into()),
                description: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(same.name, "Plumbing");
    }

    #[tokio::test]
    async fn update_conflicts_and_missing() {
        let st = AppState::fake();
        create_category(&st, create_req("Plumbing")).await.unwrap();
        let other = create_category(&st, create_req("Gardening")).await.unwrap();

        let err = update_category(
            &st,
            other.id,
            UpdateCategoryRequest {
                name: Some("Plumbing".into()),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = update_category(
            &st,
            Uuid::new_v4(),
            UpdateCategoryRequest {
                name: None,
                description: Some("x".into()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_list_is_not_found() {
        let st = AppState::fake();
        let err = list_categories(&st).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        create_category(&st, create_req("Plumbing")).await.unwrap();
        create_category(&st, create_req("Gardening")).await.unwrap();
        let names: Vec<_> = list_categories(&st)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Gardening", "Plumbing"]);
    }

    #[tokio::test]
    async fn delete_then_missing() {
        let st = AppState::fake();
        let created = create_category(&st, create_req("Plumbing")).await.unwrap();
        delete_category(&st, created.id).await.unwrap();
        let err = delete_category(&st, created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = get_category(&st, created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
