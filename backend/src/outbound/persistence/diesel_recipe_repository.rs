//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! A recipe spans four tables. Writes touch all of them inside one
//! transaction; reads load the recipe rows first and then fetch authors,
//! ingredient lines and tags for the whole batch with one query each.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use pagination::PageParams;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{
    AuthorRecipes, RecipeFilter, RecipeRepository, RecipeRepositoryError, RelationFilter,
};
use crate::domain::{
    Page, Recipe, RecipeDraft, RecipeId, RecipeIngredient, RecipeSummary, ShortCode, Tag, User,
    UserId,
};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, collect_rows, count_to_total, map_basic_pool_error,
    page_window, positive_for_db, positive_from_db,
};
use super::models::{
    IngredientRow, NewRecipeIngredientRow, NewRecipeRow, NewRecipeTagRow, RecipeRow,
    RecipeUpdate, TagRow, UserRow,
};
use super::pool::{DbPool, PoolError};
use super::row_conversions::{row_to_ingredient, row_to_tag, row_to_user};
use super::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_cart, tags, users,
};

/// Diesel-backed implementation of the recipe repository port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    map_basic_pool_error(error, RecipeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => RecipeRepositoryError::connection(message),
        DieselFailure::NotFound => RecipeRepositoryError::not_found(),
        DieselFailure::UniqueViolation { constraint }
            if constraint
                .as_deref()
                .is_some_and(|name| name.contains("short_code")) =>
        {
            RecipeRepositoryError::short_code_taken()
        }
        DieselFailure::UniqueViolation { .. } => {
            RecipeRepositoryError::query("unique constraint violated")
        }
        DieselFailure::ForeignKeyViolation { constraint } => {
            RecipeRepositoryError::unknown_reference(
                constraint.unwrap_or_else(|| "referenced row".to_owned()),
            )
        }
        DieselFailure::Query(message) => RecipeRepositoryError::query(message),
    }
}

/// Join rows for one draft, with amounts converted to `INT4`.
struct DraftLines {
    cooking_time: i32,
    ingredients: Vec<NewRecipeIngredientRow>,
    tags: Vec<NewRecipeTagRow>,
}

impl DraftLines {
    fn new(recipe_id: Uuid, draft: &RecipeDraft) -> Result<Self, RecipeRepositoryError> {
        let cooking_time = positive_for_db(draft.cooking_time(), "cooking_time")
            .map_err(RecipeRepositoryError::query)?;
        let ingredients = collect_rows(
            draft.ingredients().iter().map(|line| {
                Ok::<_, String>(NewRecipeIngredientRow {
                    recipe_id,
                    ingredient_id: line.ingredient_id.get(),
                    amount: positive_for_db(line.amount, "amount")?,
                })
            }),
            RecipeRepositoryError::query,
        )?;
        let tags = draft
            .tags()
            .iter()
            .map(|tag| NewRecipeTagRow {
                recipe_id,
                tag_id: tag.get(),
            })
            .collect();
        Ok(Self {
            cooking_time,
            ingredients,
            tags,
        })
    }
}

fn filtered_recipes(filter: &RecipeFilter) -> recipes::BoxedQuery<'static, Pg> {
    let mut query = recipes::table.into_boxed();

    if !filter.tags.is_empty() {
        let slugs: Vec<String> = filter.tags.iter().map(|slug| slug.as_ref().to_owned()).collect();
        query = query.filter(
            recipes::id.eq_any(
                recipe_tags::table
                    .inner_join(tags::table)
                    .filter(tags::slug.eq_any(slugs))
                    .select(recipe_tags::recipe_id),
            ),
        );
    }
    if let Some(author) = &filter.author {
        query = query.filter(recipes::author_id.eq(*author.as_uuid()));
    }
    if let Some(RelationFilter { user, present }) = &filter.favorited {
        let favourite_ids = favorites::table
            .filter(favorites::user_id.eq(*user.as_uuid()))
            .select(favorites::recipe_id);
        query = if *present {
            query.filter(recipes::id.eq_any(favourite_ids))
        } else {
            query.filter(recipes::id.ne_all(favourite_ids))
        };
    }
    if let Some(RelationFilter { user, present }) = &filter.in_shopping_cart {
        let cart_ids = shopping_cart::table
            .filter(shopping_cart::user_id.eq(*user.as_uuid()))
            .select(shopping_cart::recipe_id);
        query = if *present {
            query.filter(recipes::id.eq_any(cart_ids))
        } else {
            query.filter(recipes::id.ne_all(cart_ids))
        };
    }
    query
}

fn assemble(
    row: RecipeRow,
    author: User,
    ingredients: Vec<RecipeIngredient>,
    tags: Vec<Tag>,
) -> Result<Recipe, String> {
    Ok(Recipe {
        id: RecipeId::from_uuid(row.id),
        author,
        name: row.name,
        image: row.image,
        text: row.text,
        cooking_time: positive_from_db(row.cooking_time, "cooking_time")?,
        short_code: ShortCode::new(row.short_code).map_err(|err| err.to_string())?,
        created_at: row.created_at,
        ingredients,
        tags,
    })
}

/// Resolve authors, ingredient lines and tags for a batch of recipe rows,
/// preserving row order.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<RecipeRow>,
) -> Result<Vec<Recipe>, RecipeRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let recipe_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let author_ids: Vec<Uuid> = rows
        .iter()
        .map(|row| row.author_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let author_rows: Vec<UserRow> = users::table
        .filter(users::id.eq_any(author_ids))
        .select(UserRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let mut authors = HashMap::with_capacity(author_rows.len());
    for row in author_rows {
        let id = row.id;
        authors.insert(id, row_to_user(row).map_err(RecipeRepositoryError::query)?);
    }

    let line_rows: Vec<(Uuid, i32, IngredientRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids.clone()))
        .select((
            recipe_ingredients::recipe_id,
            recipe_ingredients::amount,
            IngredientRow::as_select(),
        ))
        .order_by((ingredients::name.asc(), ingredients::id.asc()))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let mut lines: HashMap<Uuid, Vec<RecipeIngredient>> = HashMap::new();
    for (recipe_id, amount, ingredient) in line_rows {
        let amount = positive_from_db(amount, "amount").map_err(RecipeRepositoryError::query)?;
        lines.entry(recipe_id).or_default().push(RecipeIngredient {
            ingredient: row_to_ingredient(ingredient),
            amount,
        });
    }

    let tag_rows: Vec<(Uuid, TagRow)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(recipe_ids))
        .select((recipe_tags::recipe_id, TagRow::as_select()))
        .order_by((tags::name.asc(), tags::id.asc()))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let mut recipe_tags_by_id: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for (recipe_id, tag) in tag_rows {
        let tag = row_to_tag(tag).map_err(RecipeRepositoryError::query)?;
        recipe_tags_by_id.entry(recipe_id).or_default().push(tag);
    }

    rows.into_iter()
        .map(|row| {
            let Some(author) = authors.get(&row.author_id).cloned() else {
                warn!(recipe_id = %row.id, author_id = %row.author_id, "recipe author missing");
                return Err(RecipeRepositoryError::query("recipe author missing"));
            };
            let ingredients = lines.remove(&row.id).unwrap_or_default();
            let tags = recipe_tags_by_id.remove(&row.id).unwrap_or_default();
            assemble(row, author, ingredients, tags).map_err(RecipeRepositoryError::query)
        })
        .collect()
}

async fn find_in(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> Result<Option<Recipe>, RecipeRepositoryError> {
    let row: Option<RecipeRow> = recipes::table
        .find(id)
        .select(RecipeRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    let Some(row) = row else {
        return Ok(None);
    };
    Ok(hydrate(conn, vec![row]).await?.pop())
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn insert(
        &self,
        id: RecipeId,
        author: &UserId,
        short_code: &ShortCode,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let recipe_id = *id.as_uuid();
        let DraftLines {
            cooking_time,
            ingredients: ingredient_rows,
            tags: tag_rows,
        } = DraftLines::new(recipe_id, draft)?;
        let new_recipe = NewRecipeRow {
            id: recipe_id,
            author_id: *author.as_uuid(),
            name: draft.name(),
            image: draft.image(),
            text: draft.text(),
            cooking_time,
            short_code: short_code.as_ref(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(recipes::table)
                    .values(&new_recipe)
                    .execute(conn)
                    .await?;
                diesel::insert_into(recipe_ingredients::table)
                    .values(&ingredient_rows)
                    .execute(conn)
                    .await?;
                diesel::insert_into(recipe_tags::table)
                    .values(&tag_rows)
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        find_in(&mut conn, recipe_id)
            .await?
            .ok_or_else(RecipeRepositoryError::not_found)
    }

    async fn update(
        &self,
        id: &RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let recipe_id = *id.as_uuid();
        let DraftLines {
            cooking_time,
            ingredients: ingredient_rows,
            tags: tag_rows,
        } = DraftLines::new(recipe_id, draft)?;
        let changes = RecipeUpdate {
            name: draft.name(),
            image: draft.image(),
            text: draft.text(),
            cooking_time,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let updated = diesel::update(recipes::table.find(recipe_id))
                    .set(&changes)
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Err(diesel::result::Error::NotFound);
                }

                diesel::delete(
                    recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
                )
                .execute(conn)
                .await?;
                diesel::insert_into(recipe_ingredients::table)
                    .values(&ingredient_rows)
                    .execute(conn)
                    .await?;

                diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                    .execute(conn)
                    .await?;
                diesel::insert_into(recipe_tags::table)
                    .values(&tag_rows)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        find_in(&mut conn, recipe_id)
            .await?
            .ok_or_else(RecipeRepositoryError::not_found)
    }

    async fn delete(&self, id: &RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Join and relation rows go with the recipe via ON DELETE CASCADE.
        let deleted = diesel::delete(recipes::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        find_in(&mut conn, *id.as_uuid()).await
    }

    async fn find_by_short_code(
        &self,
        code: &ShortCode,
    ) -> Result<Option<RecipeId>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id: Option<Uuid> = recipes::table
            .filter(recipes::short_code.eq(code.as_ref()))
            .select(recipes::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(id.map(RecipeId::from_uuid))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: &PageParams,
    ) -> Result<Page<Recipe>, RecipeRepositoryError> {
        let (limit, offset) = page_window(page).map_err(RecipeRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = filtered_recipes(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<RecipeRow> = filtered_recipes(filter)
            .select(RecipeRow::as_select())
            .order_by((recipes::created_at.desc(), recipes::id.desc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = hydrate(&mut conn, rows).await?;
        Ok(Page::new(items, count_to_total(total)))
    }

    async fn author_recipes(
        &self,
        author: &UserId,
        limit: Option<usize>,
    ) -> Result<AuthorRecipes, RecipeRepositoryError> {
        let author_id = *author.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = recipes::table
            .filter(recipes::author_id.eq(author_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut query = recipes::table
            .filter(recipes::author_id.eq(author_id))
            .select((
                recipes::id,
                recipes::name,
                recipes::image,
                recipes::cooking_time,
            ))
            .order_by((recipes::created_at.desc(), recipes::id.desc()))
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        let rows: Vec<(Uuid, String, String, i32)> =
            query.load(&mut conn).await.map_err(map_diesel_error)?;

        let recipes = collect_rows(
            rows.into_iter().map(|(id, name, image, cooking_time)| {
                Ok::<_, String>(RecipeSummary {
                    id: RecipeId::from_uuid(id),
                    name,
                    image,
                    cooking_time: positive_from_db(cooking_time, "cooking_time")?,
                })
            }),
            RecipeRepositoryError::query,
        )?;
        Ok(AuthorRecipes {
            recipes,
            total: count_to_total(total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IngredientAmount, IngredientId, RecipeDraftInput, TagId};
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    /// Database error carrying a constraint name, as PostgreSQL reports it.
    #[derive(Debug)]
    struct ConstraintError(&'static str);

    impl DatabaseErrorInformation for ConstraintError {
        fn message(&self) -> &str {
            "constraint violated"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some(self.0)
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn violation(kind: DatabaseErrorKind, constraint: &'static str) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(ConstraintError(constraint)))
    }

    #[rstest]
    #[case(
        violation(DatabaseErrorKind::UniqueViolation, "recipes_short_code_key"),
        RecipeRepositoryError::short_code_taken()
    )]
    #[case(
        violation(DatabaseErrorKind::UniqueViolation, "recipes_pkey"),
        RecipeRepositoryError::query("unique constraint violated")
    )]
    #[case(
        violation(
            DatabaseErrorKind::ForeignKeyViolation,
            "recipe_ingredients_ingredient_id_fkey"
        ),
        RecipeRepositoryError::unknown_reference("recipe_ingredients_ingredient_id_fkey")
    )]
    #[case(DieselError::NotFound, RecipeRepositoryError::not_found())]
    fn diesel_errors_map_to_recipe_errors(
        #[case] error: DieselError,
        #[case] expected: RecipeRepositoryError,
    ) {
        assert_eq!(map_diesel_error(error), expected);
    }

    #[rstest]
    fn draft_lines_bind_every_row_to_the_recipe() {
        let recipe_id = Uuid::new_v4();
        let draft = RecipeDraft::new(RecipeDraftInput {
            name: "Borscht".to_owned(),
            image: "recipes/borscht.png".to_owned(),
            text: "Simmer.".to_owned(),
            cooking_time: 90,
            ingredients: vec![
                IngredientAmount {
                    ingredient_id: IngredientId::new(7),
                    amount: 300,
                },
                IngredientAmount {
                    ingredient_id: IngredientId::new(8),
                    amount: 2,
                },
            ],
            tags: vec![TagId::new(1)],
        })
        .expect("valid draft");

        let lines = DraftLines::new(recipe_id, &draft).expect("lines fit INT4");

        assert_eq!(lines.cooking_time, 90);
        assert!(lines.ingredients.iter().all(|row| row.recipe_id == recipe_id));
        assert_eq!(
            lines
                .ingredients
                .iter()
                .map(|row| (row.ingredient_id, row.amount))
                .collect::<Vec<_>>(),
            vec![(7, 300), (8, 2)]
        );
        assert_eq!(lines.tags.len(), 1);
    }
}
