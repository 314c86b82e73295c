//! In-memory implementations of every driven port.
//!
//! [`InMemoryStore`] lets integration tests in `tests/` run the real domain
//! services end to end through HTTP without PostgreSQL. It mirrors the
//! database adapters' observable behaviour: unique relation pairs, cascading
//! recipe deletes, newest-first ordering and offset pagination.
//!
//! # Examples
//!
//! ```
//! use foodgram_backend::test_support::InMemoryStore;
//!
//! let store = InMemoryStore::new();
//! let cook = store.add_user("cook");
//! let eggs = store.add_ingredient("eggs", "pcs");
//! let state = store.http_state();
//! # let _ = (cook, eggs, state);
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use pagination::PageParams;

use crate::domain::ports::{
    AuthorRecipes, CatalogueRepository, CatalogueRepositoryError, IngredientImportRepository,
    IngredientImportRepositoryError, RecipeFilter, RecipeRepository,
    RecipeRepositoryError, RelationFilter, RelationRepository, RelationRepositoryError,
    ShoppingListRepository, ShoppingListRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    CartLine, CatalogueService, Email, Ingredient, IngredientId, NewIngredient, Page, Recipe,
    RecipeDraft,
    RecipeId, RecipeIngredient, RecipeRelationsService, RecipesService, ShoppingListService,
    ShortCode, Slug, SubscriptionsService, Tag, TagId, User, UserId, Username, UsersService,
};
use crate::inbound::http::state::HttpState;

#[derive(Default)]
struct StoreState {
    users: Vec<User>,
    ingredients: Vec<Ingredient>,
    tags: Vec<Tag>,
    /// Insertion order; the last entry is the newest recipe.
    recipes: Vec<Recipe>,
    favorites: HashSet<(UserId, RecipeId)>,
    cart: HashSet<(UserId, RecipeId)>,
    subscriptions: HashSet<(UserId, UserId)>,
    next_catalogue_id: i64,
}

impl StoreState {
    fn recipe_set(&self, set: RecipeSet) -> &HashSet<(UserId, RecipeId)> {
        match set {
            RecipeSet::Favorites => &self.favorites,
            RecipeSet::ShoppingCart => &self.cart,
        }
    }

    fn recipe_set_mut(&mut self, set: RecipeSet) -> &mut HashSet<(UserId, RecipeId)> {
        match set {
            RecipeSet::Favorites => &mut self.favorites,
            RecipeSet::ShoppingCart => &mut self.cart,
        }
    }

    fn resolve(&self, draft: &RecipeDraft) -> Result<(Vec<RecipeIngredient>, Vec<Tag>), String> {
        let ingredients = draft
            .ingredients()
            .iter()
            .map(|line| {
                self.ingredients
                    .iter()
                    .find(|ingredient| ingredient.id == line.ingredient_id)
                    .map(|ingredient| RecipeIngredient {
                        ingredient: ingredient.clone(),
                        amount: line.amount,
                    })
                    .ok_or_else(|| format!("ingredient {}", line.ingredient_id.get()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let tags = draft
            .tags()
            .iter()
            .map(|id| {
                self.tags
                    .iter()
                    .find(|tag| tag.id == *id)
                    .cloned()
                    .ok_or_else(|| format!("tag {}", id.get()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((ingredients, tags))
    }

    fn matches(&self, recipe: &Recipe, filter: &RecipeFilter) -> bool {
        let tagged = filter.tags.is_empty()
            || recipe
                .tags
                .iter()
                .any(|tag| filter.tags.contains(&tag.slug));
        let authored = filter
            .author
            .as_ref()
            .is_none_or(|author| recipe.author.id == *author);
        let related = |relation: &Option<RelationFilter>, set: RecipeSet| {
            relation.as_ref().is_none_or(|relation| {
                self.recipe_set(set)
                    .contains(&(relation.user.clone(), recipe.id))
                    == relation.present
            })
        };
        tagged
            && authored
            && related(&filter.favorited, RecipeSet::Favorites)
            && related(&filter.in_shopping_cart, RecipeSet::ShoppingCart)
    }
}

/// Offset pagination over an already ordered list.
fn paginate<T: Clone>(items: &[T], page: &PageParams) -> Page<T> {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    let slice = items.iter().skip(offset).take(limit).cloned().collect();
    Page::new(slice, items.len() as u64)
}

/// Shared in-memory database. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a user named `username` with a derived email address.
    ///
    /// # Panics
    /// Panics when `username` is not a valid username.
    pub fn add_user(&self, username: &str) -> User {
        let user = User {
            id: UserId::random(),
            email: Email::new(format!("{username}@example.com")).expect("valid email"),
            username: Username::new(username).expect("valid username"),
            first_name: username.to_owned(),
            last_name: "Cook".to_owned(),
            avatar: None,
        };
        self.lock().users.push(user.clone());
        user
    }

    /// Add an ingredient to the catalogue.
    pub fn add_ingredient(&self, name: &str, measurement_unit: &str) -> Ingredient {
        let mut state = self.lock();
        state.next_catalogue_id += 1;
        let ingredient = Ingredient {
            id: IngredientId::new(state.next_catalogue_id),
            name: name.to_owned(),
            measurement_unit: measurement_unit.to_owned(),
        };
        state.ingredients.push(ingredient.clone());
        ingredient
    }

    /// Add a tag to the catalogue.
    ///
    /// # Panics
    /// Panics when `slug` is not a valid slug.
    pub fn add_tag(&self, name: &str, slug: &str) -> Tag {
        let mut state = self.lock();
        state.next_catalogue_id += 1;
        let tag = Tag {
            id: TagId::new(state.next_catalogue_id),
            name: name.to_owned(),
            slug: Slug::new(slug).expect("valid slug"),
        };
        state.tags.push(tag.clone());
        tag
    }

    /// Favourites join table.
    pub fn favorites(&self) -> InMemoryRecipeRelations {
        InMemoryRecipeRelations {
            store: self.clone(),
            set: RecipeSet::Favorites,
        }
    }

    /// Shopping cart join table.
    pub fn shopping_cart(&self) -> InMemoryRecipeRelations {
        InMemoryRecipeRelations {
            store: self.clone(),
            set: RecipeSet::ShoppingCart,
        }
    }

    /// Subscriptions join table.
    pub fn subscriptions(&self) -> InMemorySubscriptions {
        InMemorySubscriptions {
            store: self.clone(),
        }
    }

    /// HTTP state running the real domain services over this store.
    pub fn http_state(&self) -> HttpState {
        let store = Arc::new(self.clone());
        let favorites = Arc::new(self.favorites());
        let cart = Arc::new(self.shopping_cart());
        let subscriptions = Arc::new(self.subscriptions());

        let recipes = Arc::new(RecipesService::new(
            store.clone(),
            store.clone(),
            favorites.clone(),
            cart.clone(),
            subscriptions.clone(),
        ));
        let subscribed = Arc::new(SubscriptionsService::new(
            store.clone(),
            store.clone(),
            subscriptions.clone(),
        ));

        HttpState {
            catalogue: Arc::new(CatalogueService::new(store.clone())),
            recipes: recipes.clone(),
            recipes_query: recipes,
            relations: Arc::new(RecipeRelationsService::new(store.clone(), favorites, cart)),
            shopping_list: Arc::new(ShoppingListService::new(store.clone())),
            users: Arc::new(UsersService::new(store, subscriptions)),
            subscriptions: subscribed.clone(),
            subscriptions_query: subscribed,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().users.iter().find(|user| user.id == *id).cloned())
    }

    async fn list(&self, page: &PageParams) -> Result<Page<User>, UserPersistenceError> {
        let mut users = self.lock().users.clone();
        users.sort_by(|a, b| a.username.as_ref().cmp(b.username.as_ref()));
        Ok(paginate(&users, page))
    }

    async fn subscribed_authors(
        &self,
        subscriber: &UserId,
        page: &PageParams,
    ) -> Result<Page<User>, UserPersistenceError> {
        let state = self.lock();
        let mut authors: Vec<User> = state
            .users
            .iter()
            .filter(|user| {
                state
                    .subscriptions
                    .contains(&(subscriber.clone(), user.id.clone()))
            })
            .cloned()
            .collect();
        authors.sort_by(|a, b| a.username.as_ref().cmp(b.username.as_ref()));
        Ok(paginate(&authors, page))
    }
}

#[async_trait]
impl CatalogueRepository for InMemoryStore {
    async fn list_ingredients(
        &self,
        name_prefix: &str,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        let prefix = name_prefix.to_lowercase();
        let mut ingredients: Vec<Ingredient> = self
            .lock()
            .ingredients
            .iter()
            .filter(|ingredient| ingredient.name.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect();
        ingredients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ingredients)
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        Ok(self
            .lock()
            .ingredients
            .iter()
            .find(|ingredient| ingredient.id == id)
            .cloned())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError> {
        let mut tags = self.lock().tags.clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError> {
        Ok(self.lock().tags.iter().find(|tag| tag.id == id).cloned())
    }

    async fn missing_ingredients(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, CatalogueRepositoryError> {
        let state = self.lock();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !state.ingredients.iter().any(|ingredient| ingredient.id == *id))
            .collect())
    }

    async fn missing_tags(&self, ids: &[TagId]) -> Result<Vec<TagId>, CatalogueRepositoryError> {
        let state = self.lock();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !state.tags.iter().any(|tag| tag.id == *id))
            .collect())
    }
}

#[async_trait]
impl IngredientImportRepository for InMemoryStore {
    async fn insert_missing(
        &self,
        ingredients: &[NewIngredient],
    ) -> Result<usize, IngredientImportRepositoryError> {
        let mut state = self.lock();
        let mut inserted = 0;
        for new in ingredients {
            let catalogued = state.ingredients.iter().any(|ingredient| {
                ingredient.name == new.name()
                    && ingredient.measurement_unit == new.measurement_unit()
            });
            if catalogued {
                continue;
            }
            state.next_catalogue_id += 1;
            let id = IngredientId::new(state.next_catalogue_id);
            state.ingredients.push(Ingredient {
                id,
                name: new.name().to_owned(),
                measurement_unit: new.measurement_unit().to_owned(),
            });
            inserted += 1;
        }
        Ok(inserted)
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn insert(
        &self,
        id: RecipeId,
        author: &UserId,
        short_code: &ShortCode,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut state = self.lock();
        if state
            .recipes
            .iter()
            .any(|recipe| recipe.short_code == *short_code)
        {
            return Err(RecipeRepositoryError::short_code_taken());
        }
        let author = state
            .users
            .iter()
            .find(|user| user.id == *author)
            .cloned()
            .ok_or_else(|| RecipeRepositoryError::unknown_reference(format!("author {author}")))?;
        let (ingredients, tags) = state
            .resolve(draft)
            .map_err(RecipeRepositoryError::unknown_reference)?;
        let recipe = Recipe {
            id,
            author,
            name: draft.name().to_owned(),
            image: draft.image().to_owned(),
            text: draft.text().to_owned(),
            cooking_time: draft.cooking_time(),
            short_code: short_code.clone(),
            created_at: Utc::now(),
            ingredients,
            tags,
        };
        state.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn update(
        &self,
        id: &RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut state = self.lock();
        let (ingredients, tags) = state
            .resolve(draft)
            .map_err(RecipeRepositoryError::unknown_reference)?;
        let recipe = state
            .recipes
            .iter_mut()
            .find(|recipe| recipe.id == *id)
            .ok_or_else(RecipeRepositoryError::not_found)?;
        recipe.name = draft.name().to_owned();
        recipe.image = draft.image().to_owned();
        recipe.text = draft.text().to_owned();
        recipe.cooking_time = draft.cooking_time();
        recipe.ingredients = ingredients;
        recipe.tags = tags;
        Ok(recipe.clone())
    }

    async fn delete(&self, id: &RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock();
        let before = state.recipes.len();
        state.recipes.retain(|recipe| recipe.id != *id);
        state.favorites.retain(|(_, recipe)| recipe != id);
        state.cart.retain(|(_, recipe)| recipe != id);
        Ok(state.recipes.len() != before)
    }

    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        Ok(self
            .lock()
            .recipes
            .iter()
            .find(|recipe| recipe.id == *id)
            .cloned())
    }

    async fn find_by_short_code(
        &self,
        code: &ShortCode,
    ) -> Result<Option<RecipeId>, RecipeRepositoryError> {
        Ok(self
            .lock()
            .recipes
            .iter()
            .find(|recipe| recipe.short_code == *code)
            .map(|recipe| recipe.id))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: &PageParams,
    ) -> Result<Page<Recipe>, RecipeRepositoryError> {
        let state = self.lock();
        let matching: Vec<Recipe> = state
            .recipes
            .iter()
            .rev()
            .filter(|recipe| state.matches(recipe, filter))
            .cloned()
            .collect();
        Ok(paginate(&matching, page))
    }

    async fn author_recipes(
        &self,
        author: &UserId,
        limit: Option<usize>,
    ) -> Result<AuthorRecipes, RecipeRepositoryError> {
        let state = self.lock();
        let authored: Vec<&Recipe> = state
            .recipes
            .iter()
            .rev()
            .filter(|recipe| recipe.author.id == *author)
            .collect();
        let total = authored.len() as u64;
        let recipes = authored
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(Recipe::summary)
            .collect();
        Ok(AuthorRecipes { recipes, total })
    }
}

#[async_trait]
impl ShoppingListRepository for InMemoryStore {
    async fn cart_lines(&self, user: &UserId) -> Result<Vec<CartLine>, ShoppingListRepositoryError> {
        let state = self.lock();
        Ok(state
            .recipes
            .iter()
            .filter(|recipe| state.cart.contains(&(user.clone(), recipe.id)))
            .flat_map(|recipe| recipe.ingredients.iter())
            .map(|line| CartLine {
                name: line.ingredient.name.clone(),
                measurement_unit: line.ingredient.measurement_unit.clone(),
                amount: line.amount,
            })
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecipeSet {
    Favorites,
    ShoppingCart,
}

/// Favourites or shopping cart pairs held by an [`InMemoryStore`].
#[derive(Clone)]
pub struct InMemoryRecipeRelations {
    store: InMemoryStore,
    set: RecipeSet,
}

#[async_trait]
impl RelationRepository for InMemoryRecipeRelations {
    type Target = RecipeId;

    async fn insert(&self, user: &UserId, target: &RecipeId) -> Result<(), RelationRepositoryError> {
        let mut state = self.store.lock();
        if !state.recipes.iter().any(|recipe| recipe.id == *target) {
            return Err(RelationRepositoryError::missing_target());
        }
        if state.recipe_set_mut(self.set).insert((user.clone(), *target)) {
            Ok(())
        } else {
            Err(RelationRepositoryError::already_exists())
        }
    }

    async fn remove(&self, user: &UserId, target: &RecipeId) -> Result<bool, RelationRepositoryError> {
        Ok(self
            .store
            .lock()
            .recipe_set_mut(self.set)
            .remove(&(user.clone(), *target)))
    }

    async fn targets_among(
        &self,
        user: &UserId,
        candidates: &[RecipeId],
    ) -> Result<HashSet<RecipeId>, RelationRepositoryError> {
        let state = self.store.lock();
        let set = state.recipe_set(self.set);
        Ok(candidates
            .iter()
            .copied()
            .filter(|id| set.contains(&(user.clone(), *id)))
            .collect())
    }
}

/// Subscription pairs held by an [`InMemoryStore`].
#[derive(Clone)]
pub struct InMemorySubscriptions {
    store: InMemoryStore,
}

#[async_trait]
impl RelationRepository for InMemorySubscriptions {
    type Target = UserId;

    async fn insert(&self, user: &UserId, target: &UserId) -> Result<(), RelationRepositoryError> {
        let mut state = self.store.lock();
        if !state.users.iter().any(|candidate| candidate.id == *target) {
            return Err(RelationRepositoryError::missing_target());
        }
        if state.subscriptions.insert((user.clone(), target.clone())) {
            Ok(())
        } else {
            Err(RelationRepositoryError::already_exists())
        }
    }

    async fn remove(&self, user: &UserId, target: &UserId) -> Result<bool, RelationRepositoryError> {
        Ok(self
            .store
            .lock()
            .subscriptions
            .remove(&(user.clone(), target.clone())))
    }

    async fn targets_among(
        &self,
        user: &UserId,
        candidates: &[UserId],
    ) -> Result<HashSet<UserId>, RelationRepositoryError> {
        let state = self.store.lock();
        Ok(candidates
            .iter()
            .filter(|id| state.subscriptions.contains(&(user.clone(), (*id).clone())))
            .cloned()
            .collect())
    }
}
